//! Binary brain-mask volumes on a voxel grid with a world-space affine.
//!
//! Voxels are stored x-fastest (index = x + y*nx + z*nx*ny), the NIfTI
//! on-disk convention.

pub mod intersect;
pub mod nifti_io;
pub mod overlap;
pub mod resample;

use anyhow::{Result, bail};
use nalgebra::Matrix4;

pub use intersect::{intersect_masks, largest_connected_component};
pub use overlap::{dice_coefficient, dice_with_reference};
pub use resample::resample_nearest;

pub type Affine = Matrix4<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct MaskVolume {
    dims: [usize; 3],
    affine: Affine,
    voxels: Vec<bool>,
}

impl MaskVolume {
    pub fn new(dims: [usize; 3], affine: Affine, voxels: Vec<bool>) -> Result<Self> {
        let expected = dims[0] * dims[1] * dims[2];
        if voxels.len() != expected {
            bail!(
                "mask voxel count {} does not match dims {:?} ({})",
                voxels.len(),
                dims,
                expected
            );
        }
        Ok(Self {
            dims,
            affine,
            voxels,
        })
    }

    pub fn empty(dims: [usize; 3], affine: Affine) -> Self {
        Self {
            dims,
            affine,
            voxels: vec![false; dims[0] * dims[1] * dims[2]],
        }
    }

    pub fn from_fn<F>(dims: [usize; 3], affine: Affine, f: F) -> Self
    where
        F: Fn(usize, usize, usize) -> bool,
    {
        let [nx, ny, nz] = dims;
        let mut voxels = Vec::with_capacity(nx * ny * nz);
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    voxels.push(f(i, j, k));
                }
            }
        }
        Self {
            dims,
            affine,
            voxels,
        }
    }

    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    pub fn affine(&self) -> &Affine {
        &self.affine
    }

    pub fn voxels(&self) -> &[bool] {
        &self.voxels
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        i + j * self.dims[0] + k * self.dims[0] * self.dims[1]
    }

    pub fn get(&self, i: usize, j: usize, k: usize) -> bool {
        self.voxels[self.index(i, j, k)]
    }

    /// Number of voxels inside the mask.
    pub fn count(&self) -> usize {
        self.voxels.iter().filter(|&&v| v).count()
    }

    pub fn same_grid(&self, other: &MaskVolume) -> bool {
        self.dims == other.dims && self.affine == other.affine
    }

    pub fn is_subset_of(&self, other: &MaskVolume) -> bool {
        self.dims == other.dims
            && self
                .voxels
                .iter()
                .zip(&other.voxels)
                .all(|(&a, &b)| !a || b)
    }
}

/// Diagonal affine with the given voxel size and zero origin.
pub fn scaled_affine(voxel_size: [f64; 3]) -> Affine {
    let mut affine = Affine::identity();
    affine[(0, 0)] = voxel_size[0];
    affine[(1, 1)] = voxel_size[1];
    affine[(2, 2)] = voxel_size[2];
    affine
}
