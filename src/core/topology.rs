/// Rule for grouping an index buffer into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Topology {
    #[default]
    TriangleList,
    TriangleStrip,
}

impl Topology {
    /// Number of triangles an index buffer of `index_count` yields.
    pub fn triangle_count(self, index_count: usize) -> usize {
        match self {
            Topology::TriangleList => index_count / 3,
            Topology::TriangleStrip => index_count.saturating_sub(2),
        }
    }

    /// Walks `indices` and yields one index triple per triangle.
    pub fn triangles(self, indices: &[u32]) -> Triangles<'_> {
        Triangles {
            indices,
            topology: self,
            next: 0,
            count: self.triangle_count(indices.len()),
        }
    }
}

/// Iterator over the index triples of a mesh.
///
/// Strips flip the winding of every odd triangle so all faces keep the
/// orientation of the first one.
pub struct Triangles<'a> {
    indices: &'a [u32],
    topology: Topology,
    next: usize,
    count: usize,
}

impl Iterator for Triangles<'_> {
    type Item = [u32; 3];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let i = self.next;
        self.next += 1;

        let idx = self.indices;
        Some(match self.topology {
            Topology::TriangleList => [idx[3 * i], idx[3 * i + 1], idx[3 * i + 2]],
            Topology::TriangleStrip if i % 2 == 0 => [idx[i], idx[i + 1], idx[i + 2]],
            Topology::TriangleStrip => [idx[i], idx[i + 2], idx[i + 1]],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Triangles<'_> {}
