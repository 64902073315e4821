use anyhow::Result;
use nalgebra::Vector4;

use crate::error::QcError;
use crate::volume::{Affine, MaskVolume};

/// Nearest-neighbour resampling of `source` onto the grid described by
/// `dims` and `affine`. Target voxels that map outside the source grid
/// are outside the mask.
pub fn resample_nearest(source: &MaskVolume, dims: [usize; 3], affine: &Affine) -> Result<MaskVolume> {
    let inverse = source.affine().try_inverse().ok_or_else(|| {
        QcError::GeometryMismatch("source affine is not invertible".to_string())
    })?;
    let target_to_source = inverse * affine;
    let [sx, sy, sz] = source.dims();

    let resampled = MaskVolume::from_fn(dims, *affine, |i, j, k| {
        let p = target_to_source * Vector4::new(i as f64, j as f64, k as f64, 1.0);
        let (x, y, z) = (p[0].round(), p[1].round(), p[2].round());
        if x < 0.0 || y < 0.0 || z < 0.0 {
            return false;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        x < sx && y < sy && z < sz && source.get(x, y, z)
    });
    Ok(resampled)
}

impl MaskVolume {
    /// This mask on `reference`'s grid; a plain copy when the grids agree.
    pub fn resample_like(&self, reference: &MaskVolume) -> Result<MaskVolume> {
        if self.same_grid(reference) {
            return Ok(self.clone());
        }
        resample_nearest(self, reference.dims(), reference.affine())
    }
}
