use crate::cells::Coordinate3D;
use crate::errors::MazeError;
use crate::units::{FloorSize, Height, Length, NodeId, NodesCount, Width};


/// Validated `length x width x height` extents of a 3d lattice.
///
/// Owns the id <-> coordinate bijection `id = z * floorsize + y * length + x`.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct GridDimensions3D {
    length: Length,
    width: Width,
    height: Height,
}

impl GridDimensions3D {
    /// Fails if any extent is zero, if the cell count overflows, or if a coordinate would not fit
    /// in a `u32`.
    pub fn new(length: Length, width: Width, height: Height) -> Result<GridDimensions3D, MazeError> {
        let invalid = MazeError::InvalidDimensions {
            length: length.0,
            width: width.0,
            height: height.0,
        };
        if length.0 == 0 || width.0 == 0 || height.0 == 0 {
            return Err(invalid);
        }
        let too_wide = |extent: usize| extent > u32::MAX as usize;
        if too_wide(length.0) || too_wide(width.0) || too_wide(height.0) {
            return Err(invalid);
        }
        length.0
              .checked_mul(width.0)
              .and_then(|floor| floor.checked_mul(height.0))
              .ok_or(invalid)?;

        Ok(GridDimensions3D {
            length: length,
            width: width,
            height: height,
        })
    }

    #[inline(always)]
    pub fn length(&self) -> Length {
        self.length
    }

    #[inline(always)]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline(always)]
    pub fn floorsize(&self) -> FloorSize {
        FloorSize(self.length.0 * self.width.0)
    }

    #[inline(always)]
    pub fn size(&self) -> NodesCount {
        NodesCount(self.floorsize().0 * self.height.0)
    }

    /// The far corner of the lattice.
    pub fn far_corner(&self) -> Coordinate3D {
        Coordinate3D::new(self.length.0 as u32 - 1,
                          self.width.0 as u32 - 1,
                          self.height.0 as u32 - 1)
    }

    #[inline]
    pub fn is_valid_coordinate(&self, coord: Coordinate3D) -> bool {
        (coord.x as usize) < self.length.0 && (coord.y as usize) < self.width.0 &&
        (coord.z as usize) < self.height.0
    }

    pub fn check_bounds(&self, coord: Coordinate3D) -> Result<(), MazeError> {
        if self.is_valid_coordinate(coord) {
            Ok(())
        } else {
            Err(MazeError::OutOfBounds {
                coord: coord,
                length: self.length.0,
                width: self.width.0,
                height: self.height.0,
            })
        }
    }

    /// Unchecked flattening, callers must have validated `coord`.
    #[inline(always)]
    pub(crate) fn flatten(&self, coord: Coordinate3D) -> usize {
        coord.z as usize * self.floorsize().0 + coord.y as usize * self.length.0 + coord.x as usize
    }

    pub fn node_id(&self, coord: Coordinate3D) -> Result<NodeId, MazeError> {
        self.check_bounds(coord)?;
        Ok(self.flatten(coord))
    }

    pub fn coordinate(&self, node: NodeId) -> Result<Coordinate3D, MazeError> {
        let NodesCount(size) = self.size();
        if node >= size {
            return Err(MazeError::InvalidNode { node: node, size: size });
        }
        let FloorSize(floorsize) = self.floorsize();
        let z = node / floorsize;
        let in_floor = node % floorsize;
        let y = in_floor / self.length.0;
        let x = in_floor % self.length.0;
        Ok(Coordinate3D::new(x as u32, y as u32, z as u32))
    }

    /// Every coordinate in node id order.
    pub fn iter(&self) -> impl Iterator<Item = Coordinate3D> {
        let dims = *self;
        (0..self.size().0).map(move |node| {
            let FloorSize(floorsize) = dims.floorsize();
            let in_floor = node % floorsize;
            Coordinate3D::new((in_floor % dims.length.0) as u32,
                              (in_floor / dims.length.0) as u32,
                              (node / floorsize) as u32)
        })
    }
}
