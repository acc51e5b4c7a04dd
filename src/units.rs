/// Flattened cell address: `z * floorsize + y * length + x`.
pub type NodeId = usize;

/// Extent along the x axis.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Length(pub usize);

/// Extent along the y axis.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Width(pub usize);

/// Extent along the z axis, the number of levels.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Height(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct NodesCount(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct FloorSize(pub usize);
