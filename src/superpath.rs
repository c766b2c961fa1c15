//! Cubic super-path: every sub-path is a list of nodes connected by cubic segments
use crate::{
    ArcLength, BBox, Cubic, EllipArc, Error, PathCmd, Point, Scalar, Transform, format_path,
    parse_path,
};
use bytemuck::{Pod, Zeroable};
use std::{fmt, ops::Range, str::FromStr};

/// Anchor point together with its incoming and outgoing handles
///
/// Stored as `[incoming, anchor, outgoing]`.
#[derive(Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Node(pub [Point; 3]);

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Node([incoming, anchor, outgoing]) = self;
        write!(f, "Node {:?} [{:?}] {:?}", incoming, anchor, outgoing)
    }
}

impl Node {
    pub fn new(
        incoming: impl Into<Point>,
        anchor: impl Into<Point>,
        outgoing: impl Into<Point>,
    ) -> Self {
        Self([incoming.into(), anchor.into(), outgoing.into()])
    }

    /// Node with both handles colocated with the anchor
    pub fn corner(anchor: impl Into<Point>) -> Self {
        let anchor = anchor.into();
        Self([anchor, anchor, anchor])
    }

    pub fn incoming(&self) -> Point {
        self.0[0]
    }

    pub fn anchor(&self) -> Point {
        self.0[1]
    }

    pub fn outgoing(&self) -> Point {
        self.0[2]
    }

    pub fn transform(&self, tr: Transform) -> Self {
        let Node([incoming, anchor, outgoing]) = self;
        Self([tr.apply(*incoming), tr.apply(*anchor), tr.apply(*outgoing)])
    }

    /// Swap incoming and outgoing handles
    pub fn reverse(&self) -> Self {
        let Node([incoming, anchor, outgoing]) = *self;
        Self([outgoing, anchor, incoming])
    }

    /// Cubic segment going from this node to the `next` one
    pub fn segment_to(&self, next: &Node) -> Cubic {
        Cubic([self.anchor(), self.outgoing(), next.incoming(), next.anchor()])
    }
}

/// Collection of sub-paths stored in a single node arena
///
/// Every sub-path contains at least one node, sub-path with `k` nodes
/// has `k - 1` cubic segments.
#[derive(Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Vec<Node>>", into = "Vec<Vec<Node>>")
)]
pub struct SuperPath {
    /// nodes of all sub-paths
    nodes: Vec<Node>,
    /// exclusive end offset of each sub-path in `nodes`
    ends: Vec<usize>,
}

impl fmt::Debug for SuperPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for subpath in self.subpaths() {
            list.entry(&subpath);
        }
        list.finish()
    }
}

impl SuperPath {
    /// Create super-path from the list of sub-paths, fails if any of them is empty
    pub fn new(subpaths: Vec<Vec<Node>>) -> Result<Self, Error> {
        let mut path = Self::default();
        for (index, subpath) in subpaths.into_iter().enumerate() {
            if subpath.is_empty() {
                return Err(Error::EmptySubPath(index));
            }
            path.nodes.extend(subpath);
            path.ends.push(path.nodes.len());
        }
        Ok(path)
    }

    /// Build super-path from absolute path commands
    pub fn from_commands(cmds: &[PathCmd]) -> Result<Self, Error> {
        let mut builder = SuperPathBuilder::default();
        for cmd in cmds {
            builder.push(*cmd)?;
        }
        let path = builder.build();
        tracing::trace!(
            subpaths = path.len(),
            nodes = path.nodes.len(),
            "super-path built"
        );
        Ok(path)
    }

    /// Convert super-path to absolute path commands
    ///
    /// Every segment is emitted as a cubic, close commands are never emitted
    /// since closing segment is stored explicitly.
    pub fn to_commands(&self) -> Vec<PathCmd> {
        let mut cmds = Vec::with_capacity(self.nodes.len());
        for subpath in self.subpaths() {
            cmds.push(PathCmd::MoveTo(subpath[0].anchor()));
            cmds.extend(subpath.windows(2).map(|pair| {
                let Cubic([_, p1, p2, p3]) = pair[0].segment_to(&pair[1]);
                PathCmd::CubicTo(p1, p2, p3)
            }));
        }
        cmds
    }

    /// Number of sub-paths
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// Range of arena nodes occupied by the sub-path
    fn range(&self, subpath: usize) -> Option<Range<usize>> {
        let end = *self.ends.get(subpath)?;
        let start = match subpath {
            0 => 0,
            _ => self.ends[subpath - 1],
        };
        Some(start..end)
    }

    /// Arena offset of the node
    fn offset(&self, subpath: usize, node: usize) -> Result<usize, Error> {
        match self.range(subpath) {
            Some(range) if node < range.len() => Ok(range.start + node),
            _ => Err(Error::IndexOutOfRange { subpath, node }),
        }
    }

    /// Iterator over nodes of all sub-paths
    pub fn subpaths(&self) -> impl Iterator<Item = &[Node]> + '_ {
        let starts = std::iter::once(0).chain(self.ends.iter().copied());
        starts
            .zip(self.ends.iter().copied())
            .map(|(start, end)| &self.nodes[start..end])
    }

    /// Nodes of the sub-path
    pub fn nodes(&self, subpath: usize) -> Option<&[Node]> {
        Some(&self.nodes[self.range(subpath)?])
    }

    /// Node at index `node` of the sub-path
    pub fn node(&self, subpath: usize, node: usize) -> Option<Node> {
        self.nodes(subpath)?.get(node).copied()
    }

    /// Mutable reference to the node
    pub fn node_mut(&mut self, subpath: usize, node: usize) -> Option<&mut Node> {
        let offset = self.offset(subpath, node).ok()?;
        self.nodes.get_mut(offset)
    }

    /// Replace node, returns previous value
    pub fn set_node(&mut self, subpath: usize, node: usize, value: Node) -> Result<Node, Error> {
        let offset = self.offset(subpath, node)?;
        Ok(std::mem::replace(&mut self.nodes[offset], value))
    }

    /// Segment connecting node `index` and node `index + 1` of the sub-path
    pub fn segment(&self, subpath: usize, index: usize) -> Option<Cubic> {
        let nodes = self.nodes(subpath)?;
        Some(nodes.get(index)?.segment_to(nodes.get(index + 1)?))
    }

    /// Iterator over segments of the sub-path
    pub fn segments(&self, subpath: usize) -> impl Iterator<Item = Cubic> + '_ {
        self.nodes(subpath)
            .unwrap_or_default()
            .windows(2)
            .map(|pair| pair[0].segment_to(&pair[1]))
    }

    /// Write cubic segment back into the two nodes it spans
    ///
    /// Affects anchor and outgoing handle of node `index` and incoming handle
    /// and anchor of node `index + 1`.
    pub fn set_segment(
        &mut self,
        subpath: usize,
        index: usize,
        cubic: Cubic,
    ) -> Result<(), Error> {
        let start = self.offset(subpath, index)?;
        let end = self.offset(subpath, index + 1)?;
        let Cubic([p0, p1, p2, p3]) = cubic;
        let Node([_, n0_anchor, n0_outgoing]) = &mut self.nodes[start];
        *n0_anchor = p0;
        *n0_outgoing = p1;
        let Node([n1_incoming, n1_anchor, _]) = &mut self.nodes[end];
        *n1_incoming = p2;
        *n1_anchor = p3;
        Ok(())
    }

    /// Apply affine transformation to every point in place
    pub fn transform(&mut self, tr: Transform) {
        for node in self.nodes.iter_mut() {
            *node = node.transform(tr);
        }
    }

    /// Super-path with every sub-path traversed in the opposite direction
    pub fn reverse(&self) -> Self {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for subpath in self.subpaths() {
            nodes.extend(subpath.iter().rev().map(Node::reverse));
        }
        Self {
            nodes,
            ends: self.ends.clone(),
        }
    }

    /// Insert new node at parameter `t` of the segment `index` without changing the shape
    pub fn split_segment(&mut self, subpath: usize, index: usize, t: Scalar) -> Result<(), Error> {
        let cubic = self
            .segment(subpath, index)
            .ok_or(Error::IndexOutOfRange { subpath, node: index })?;
        let (left, right) = cubic.split_at(t);
        let Cubic([_, l1, l2, l3]) = left;
        let Cubic([_, r1, r2, _]) = right;
        self.set_segment(subpath, index, Cubic([left.start(), l1, r2, right.end()]))?;
        self.insert_node(subpath, index + 1, Node([l2, l3, r1]))
    }

    /// Insert node at index `node` of the sub-path, shifting following nodes
    fn insert_node(&mut self, subpath: usize, node: usize, value: Node) -> Result<(), Error> {
        let range = self
            .range(subpath)
            .filter(|range| range.start + node <= range.end)
            .ok_or(Error::IndexOutOfRange { subpath, node })?;
        self.nodes.insert(range.start + node, value);
        for end in self.ends[subpath..].iter_mut() {
            *end += 1;
        }
        Ok(())
    }

    /// Lengths of segments grouped by sub-path, and their total sum
    pub fn lengths(&self, config: &ArcLength) -> (Vec<Vec<Scalar>>, Scalar) {
        let lengths: Vec<Vec<_>> = (0..self.len())
            .map(|subpath| {
                self.segments(subpath)
                    .map(|cubic| cubic.length(config))
                    .collect()
            })
            .collect();
        let total = lengths.iter().flatten().sum();
        (lengths, total)
    }

    /// Point at arc length `length` from the start of the sub-path
    ///
    /// Lengths beyond the ends of the sub-path are clamped to its end points.
    pub fn point_at_length(
        &self,
        subpath: usize,
        length: Scalar,
        config: &ArcLength,
    ) -> Option<Point> {
        let nodes = self.nodes(subpath)?;
        let mut remaining = length.max(0.0);
        for cubic in self.segments(subpath) {
            let segment_length = cubic.length(config);
            if remaining <= segment_length {
                if segment_length <= 0.0 {
                    return Some(cubic.start());
                }
                let t = cubic.param_at_length(remaining / segment_length, config.tolerance);
                return Some(cubic.at(t));
            }
            remaining -= segment_length;
        }
        nodes.last().map(Node::anchor)
    }

    /// Make every sub-path end where it starts
    ///
    /// If the end is farther than `tolerance` from the start, a straight closing
    /// segment is appended, otherwise the last anchor is moved onto the first one.
    pub fn close_all(&mut self, tolerance: Scalar) {
        for subpath in 0..self.len() {
            let Some(range) = self.range(subpath) else {
                continue;
            };
            let start = self.nodes[range.start].anchor();
            let last = &mut self.nodes[range.end - 1];
            if last.anchor().dist(start) > tolerance {
                let Node([_, anchor, outgoing]) = last;
                *outgoing = *anchor;
                self.nodes.insert(range.end, Node::corner(start));
                for end in self.ends[subpath..].iter_mut() {
                    *end += 1;
                }
            } else {
                last.0[1] = start;
            }
        }
    }

    /// Bounding box of all anchors and handles
    pub fn rough_bbox(&self) -> Option<BBox> {
        BBox::from_points(self.nodes.iter().flat_map(|node| node.0))
    }

    /// Exact bounding box of the curves
    ///
    /// Single node sub-paths contribute their anchor.
    pub fn bbox(&self) -> Option<BBox> {
        let mut bbox: Option<BBox> = None;
        for (index, subpath) in self.subpaths().enumerate() {
            if let [node] = subpath {
                bbox = Some(BBox::new(node.anchor(), node.anchor()).union_opt(bbox));
                continue;
            }
            for cubic in self.segments(index) {
                bbox = Some(cubic.bbox(bbox));
            }
        }
        bbox
    }

    /// Flat view of all coordinates of all nodes
    ///
    /// Each node contributes `[in_x, in_y, anchor_x, anchor_y, out_x, out_y]`.
    pub fn coords(&self) -> &[Scalar] {
        bytemuck::cast_slice(&self.nodes)
    }

    /// Serialize super-path as nested JSON arrays
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize super-path from nested JSON arrays
    #[cfg(feature = "serde")]
    pub fn from_json(text: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Incrementally converts path commands into super-path nodes
#[derive(Default)]
struct SuperPathBuilder {
    nodes: Vec<Node>,
    ends: Vec<usize>,
    /// current sub-path start, last point and last control point
    current: Option<(Point, Point, Point)>,
}

impl SuperPathBuilder {
    fn push(&mut self, cmd: PathCmd) -> Result<(), Error> {
        if let PathCmd::MoveTo(p) = cmd {
            self.finish();
            self.current = Some((p, p, p));
            return Ok(());
        }
        let Some((start, mut last, mut last_ctrl)) = self.current else {
            return Err(Error::MissingMoveTo);
        };
        match cmd {
            PathCmd::MoveTo(_) => {}
            PathCmd::LineTo(p) => {
                self.nodes.push(Node([last_ctrl, last, last]));
                last = p;
                last_ctrl = p;
            }
            PathCmd::CubicTo(p1, p2, p3) => {
                self.nodes.push(Node([last_ctrl, last, p1]));
                last = p3;
                last_ctrl = p2;
            }
            PathCmd::QuadTo(p1, p2) => {
                let Cubic([_, c1, c2, _]) = Cubic::from_quad(last, p1, p2);
                self.nodes.push(Node([last_ctrl, last, c1]));
                last = p2;
                last_ctrl = c2;
            }
            PathCmd::ArcTo {
                radii,
                x_axis_rot,
                large,
                sweep,
                dst,
            } => {
                match EllipArc::new_param(last, dst, radii.x(), radii.y(), x_axis_rot, large, sweep)
                {
                    Some(arc) => {
                        for Cubic([_, p1, p2, p3]) in arc.to_cubics() {
                            self.nodes.push(Node([last_ctrl, last, p1]));
                            last = p3;
                            last_ctrl = p2;
                        }
                    }
                    None => {
                        self.nodes.push(Node([last_ctrl, last, last]));
                        last_ctrl = dst;
                    }
                }
                last = dst;
            }
            PathCmd::Close => {
                self.nodes.push(Node([last_ctrl, last, last]));
                last = start;
                last_ctrl = start;
            }
        }
        self.current = Some((start, last, last_ctrl));
        Ok(())
    }

    /// Terminate current sub-path with its last node
    fn finish(&mut self) {
        if let Some((_, last, last_ctrl)) = self.current.take() {
            self.nodes.push(Node([last_ctrl, last, last]));
            self.ends.push(self.nodes.len());
        }
    }

    fn build(mut self) -> SuperPath {
        self.finish();
        SuperPath {
            nodes: self.nodes,
            ends: self.ends,
        }
    }
}

impl TryFrom<Vec<Vec<Node>>> for SuperPath {
    type Error = Error;

    fn try_from(subpaths: Vec<Vec<Node>>) -> Result<Self, Self::Error> {
        Self::new(subpaths)
    }
}

impl From<SuperPath> for Vec<Vec<Node>> {
    fn from(path: SuperPath) -> Self {
        path.subpaths().map(|subpath| subpath.to_vec()).collect()
    }
}

impl FromStr for SuperPath {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_commands(&parse_path(text)?)
    }
}

impl fmt::Display for SuperPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_path(&self.to_commands()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    fn assert_point(p0: Point, p1: Point) {
        assert!(p0.dist(p1) < 1e-6, "{:?} != {:?}", p0, p1);
    }

    #[test]
    fn test_round_trip() -> Result<(), Error> {
        let path: SuperPath = "M 0,0 L 10,0 L 10,10 Z".parse()?;
        assert_eq!(path.len(), 1);
        assert_eq!(path.nodes(0).map(|nodes| nodes.len()), Some(4));

        let text = path.to_string();
        assert!(!text.contains('Z'));
        let path: SuperPath = text.parse()?;
        let lines = [
            (Point::new(0.0, 0.0), Point::new(10.0, 0.0)),
            (Point::new(10.0, 0.0), Point::new(10.0, 10.0)),
            (Point::new(10.0, 10.0), Point::new(0.0, 0.0)),
        ];
        assert_eq!(path.segments(0).count(), lines.len());
        for (cubic, (p0, p1)) in path.segments(0).zip(lines) {
            for t in [0.0, 0.5, 1.0] {
                assert_point(cubic.at(t), p0.lerp(p1, t));
            }
        }
        Ok(())
    }

    #[test]
    fn test_round_trip_fractional() -> Result<(), Error> {
        let text = "M12345.678,0.000123456 C20000.5,1 30000.25,2 40000.125,3 \
            Q40100.75,-17.125 40321.0625,0.3 A150.5,75.25 33.3 1 0 40050.1,-0.000987 Z \
            M-0.1,-0.2 c0.333,0.666 1.111,-2.222 3.5,0.000042";
        let path: SuperPath = text.parse()?;
        let path_back: SuperPath = path.to_string().parse()?;
        assert_eq!(path_back, path);

        assert_eq!(path_back.len(), 2);
        for subpath in 0..path.len() {
            assert_eq!(
                path_back.segments(subpath).count(),
                path.segments(subpath).count()
            );
            let segments = path_back.segments(subpath).zip(path.segments(subpath));
            for (cubic, expected) in segments {
                for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
                    assert_eq!(cubic.at(t), expected.at(t));
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_from_commands() -> Result<(), Error> {
        let path: SuperPath = "M0,0 C1,1 2,1 3,0 Q4,-1 6,0".parse()?;
        let nodes = path.nodes(0).unwrap_or_default();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0], Node::new((0.0, 0.0), (0.0, 0.0), (1.0, 1.0)));
        assert_eq!(nodes[1].incoming(), Point::new(2.0, 1.0));
        assert_eq!(nodes[1].anchor(), Point::new(3.0, 0.0));
        // quadratic is degree elevated
        let quad = path.segment(0, 1).unwrap();
        for t in [0.25, 0.5, 0.75] {
            let q = (1.0 - t) * (1.0 - t) * Point::new(3.0, 0.0)
                + 2.0 * t * (1.0 - t) * Point::new(4.0, -1.0)
                + t * t * Point::new(6.0, 0.0);
            assert_point(quad.at(t), q);
        }
        assert_eq!(nodes[2].outgoing(), nodes[2].anchor());

        let path: SuperPath = "M0,0 L1,0 M5,5 L6,6 L7,7 M9,9".parse()?;
        assert_eq!(path.len(), 3);
        let sizes: Vec<_> = path.subpaths().map(|nodes| nodes.len()).collect();
        assert_eq!(sizes, vec![2, 3, 1]);
        assert_eq!(path.node(1, 0), Some(Node::corner((5.0, 5.0))));

        assert!(matches!(
            "L1,1".parse::<SuperPath>(),
            Err(Error::MissingMoveTo)
        ));
        assert!(SuperPath::from_commands(&[])?.is_empty());
        Ok(())
    }

    #[test]
    fn test_arc() -> Result<(), Error> {
        let path: SuperPath = "M0,0 A5,5 0 0,1 10,0".parse()?;
        assert_eq!(path.segments(0).count(), 2);
        assert_eq!(path.node(0, 2).map(|node| node.anchor()), Some(Point::new(10.0, 0.0)));
        for cubic in path.segments(0) {
            for i in 0..=8 {
                let p = cubic.at(i as Scalar / 8.0);
                assert_approx_eq!(p.dist(Point::new(5.0, 0.0)), 5.0, 0.01);
            }
        }

        // zero radius arc is a straight line
        let path: SuperPath = "M0,0 A0,5 0 0 1 10,0".parse()?;
        let segments: Vec<_> = path.segments(0).collect();
        assert_eq!(segments, vec![Cubic::from_line((0.0, 0.0), (10.0, 0.0))]);
        Ok(())
    }

    #[test]
    fn test_node_access() -> Result<(), Error> {
        let mut path: SuperPath = "M0,0 L1,0 L2,0 M5,5 L6,6".parse()?;
        let old = path.set_node(0, 1, Node::new((1.0, 1.0), (1.0, 2.0), (1.0, 3.0)))?;
        assert_eq!(old, Node::corner((1.0, 0.0)));
        assert_eq!(path.node(0, 1).map(|node| node.anchor()), Some(Point::new(1.0, 2.0)));

        if let Some(node) = path.node_mut(1, 1) {
            node.0[1] = Point::new(7.0, 7.0);
        }
        assert_eq!(path.node(1, 1).map(|node| node.anchor()), Some(Point::new(7.0, 7.0)));

        assert!(matches!(
            path.set_node(0, 3, Node::default()),
            Err(Error::IndexOutOfRange { subpath: 0, node: 3 })
        ));
        assert!(path.node_mut(2, 0).is_none());
        assert!(path.node(1, 2).is_none());
        assert!(path.segment(1, 1).is_none());

        let cubic = Cubic::new((0.0, 0.0), (1.0, 1.0), (2.0, 1.0), (3.0, 0.0));
        path.set_segment(1, 0, cubic)?;
        assert_eq!(path.segment(1, 0), Some(cubic));
        assert!(path.set_segment(1, 1, cubic).is_err());
        // other sub-path is untouched
        assert_eq!(path.node(0, 0), Some(Node::corner((0.0, 0.0))));
        Ok(())
    }

    #[test]
    fn test_new() {
        let nodes = vec![Node::corner((0.0, 0.0)), Node::corner((1.0, 1.0))];
        let path = SuperPath::new(vec![nodes.clone(), vec![Node::corner((3.0, 3.0))]]);
        assert!(path.is_ok_and(|path| path.len() == 2));
        assert!(matches!(
            SuperPath::new(vec![nodes, Vec::new()]),
            Err(Error::EmptySubPath(1))
        ));
    }

    #[test]
    fn test_split_segment() -> Result<(), Error> {
        let mut path: SuperPath = "M0,0 C0,10 10,10 10,0 L20,0 M30,30 L40,40".parse()?;
        let original = path.segment(0, 0).unwrap();
        path.split_segment(0, 0, 0.3)?;
        assert_eq!(path.nodes(0).map(|nodes| nodes.len()), Some(4));

        let left = path.segment(0, 0).unwrap();
        let right = path.segment(0, 1).unwrap();
        for i in 0..=10 {
            let s = i as Scalar / 10.0;
            assert_point(left.at(s), original.at(0.3 * s));
            assert_point(right.at(s), original.at(0.3 + 0.7 * s));
        }
        // following segments and sub-paths are preserved
        assert_eq!(
            path.segment(0, 2),
            Some(Cubic::from_line((10.0, 0.0), (20.0, 0.0)))
        );
        assert_eq!(path.node(1, 0), Some(Node::corner((30.0, 30.0))));
        assert_eq!(path.nodes(1).map(|nodes| nodes.len()), Some(2));

        assert!(path.split_segment(1, 1, 0.5).is_err());
        Ok(())
    }

    #[test]
    fn test_reverse() -> Result<(), Error> {
        let path: SuperPath = "M0,0 C1,2 3,4 5,6 L7,0 M1,1 L2,2".parse()?;
        let reversed = path.reverse();
        assert_eq!(reversed.reverse(), path);
        for subpath in 0..path.len() {
            let forward: Vec<_> = path.segments(subpath).collect();
            let backward: Vec<_> = reversed.segments(subpath).collect();
            assert_eq!(forward.len(), backward.len());
            for (f, b) in forward.iter().zip(backward.iter().rev()) {
                assert_eq!(f.reverse(), *b);
            }
        }
        Ok(())
    }

    #[test]
    fn test_lengths() -> Result<(), Error> {
        let config = ArcLength::default();
        let path: SuperPath = "M0,0 L10,0 L10,10 L0,10 Z M20,0 L23,4".parse()?;
        let (lengths, total) = path.lengths(&config);
        let sizes: Vec<_> = lengths.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 1]);
        let expected = [10.0, 10.0, 10.0, 10.0, 5.0];
        for (length, expected) in lengths.iter().flatten().zip(expected) {
            assert_approx_eq!(length, expected, 1e-3);
        }
        assert_approx_eq!(total, 45.0, 1e-3);

        assert_point(
            path.point_at_length(0, 15.0, &config).unwrap(),
            Point::new(10.0, 5.0),
        );
        // inversion is accurate up to the length tolerance
        let p = path.point_at_length(0, 0.0, &config).unwrap();
        assert!(p.dist(Point::new(0.0, 0.0)) < 1e-2);
        assert_point(
            path.point_at_length(0, 100.0, &config).unwrap(),
            Point::new(0.0, 0.0),
        );
        let p = path
            .point_at_length(1, 2.5, &ArcLength::gravesen(1e-3))
            .unwrap();
        assert!(p.dist(Point::new(21.5, 2.0)) < 1e-2);
        assert!(path.point_at_length(2, 1.0, &config).is_none());
        Ok(())
    }

    #[test]
    fn test_close_all() -> Result<(), Error> {
        let mut path: SuperPath = "M0,0 C3,3 7,3 10,0 L10,10 M20,0 L30,0 L20,0.01".parse()?;
        path.close_all(0.1);
        let first = path.nodes(0).unwrap_or_default();
        assert_eq!(first.len(), 4);
        assert_eq!(first[2].outgoing(), first[2].anchor());
        assert_eq!(first[3], Node::corner((0.0, 0.0)));

        let second = path.nodes(1).unwrap_or_default();
        assert_eq!(second.len(), 3);
        assert_eq!(second[2].anchor(), Point::new(20.0, 0.0));
        assert_eq!(second[0].anchor(), Point::new(20.0, 0.0));
        Ok(())
    }

    #[test]
    fn test_bbox() -> Result<(), Error> {
        let path: SuperPath = "M0,0 C10,-3 -4,-3 6,0".parse()?;
        let bbox = path.bbox().unwrap();
        assert_approx_eq!(bbox.min().y(), -2.25);
        assert_eq!(bbox.to_tuple().0, 0.0);
        assert_eq!(bbox.to_tuple().1, 6.0);
        let rough = path.rough_bbox().unwrap();
        assert_eq!(rough.to_tuple(), (-4.0, 10.0, -3.0, 0.0));

        let path: SuperPath = "M0,0 L1,1 M20,-5".parse()?;
        assert_eq!(path.bbox().unwrap().to_tuple(), (0.0, 20.0, -5.0, 1.0));

        assert!(SuperPath::default().bbox().is_none());
        assert!(SuperPath::default().rough_bbox().is_none());
        Ok(())
    }

    #[test]
    fn test_transform() -> Result<(), Error> {
        let mut path: SuperPath = "M1,2 C3,4 5,6 7,8".parse()?;
        path.transform(Transform::new_translate(10.0, 0.0).scale(2.0, 2.0));
        assert_eq!(
            path.segment(0, 0),
            Some(Cubic::new((12.0, 4.0), (16.0, 8.0), (20.0, 12.0), (24.0, 16.0)))
        );
        assert_eq!(
            path.coords(),
            &[12.0, 4.0, 12.0, 4.0, 16.0, 8.0, 20.0, 12.0, 24.0, 16.0, 24.0, 16.0]
        );
        Ok(())
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json() -> Result<(), Error> {
        let path: SuperPath = "M0,0 L1,0".parse()?;
        let json = path.to_json()?;
        assert_eq!(
            json,
            "[[[[0.0,0.0],[0.0,0.0],[0.0,0.0]],[[1.0,0.0],[1.0,0.0],[1.0,0.0]]]]"
        );
        assert_eq!(SuperPath::from_json(&json)?, path);
        assert!(matches!(
            SuperPath::from_json("[[]]"),
            Err(Error::Json(_))
        ));
        Ok(())
    }
}
