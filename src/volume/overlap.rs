use anyhow::Result;

use crate::error::QcError;
use crate::volume::MaskVolume;

/// Sørensen-Dice coefficient of two masks on the same grid.
/// Two empty masks score 0.
pub fn dice_coefficient(a: &MaskVolume, b: &MaskVolume) -> Result<f64> {
    if a.dims() != b.dims() {
        return Err(QcError::GeometryMismatch(format!(
            "dice on different shapes {:?} and {:?}",
            a.dims(),
            b.dims()
        ))
        .into());
    }
    let mut intersection = 0usize;
    let mut total = 0usize;
    for (&x, &y) in a.voxels().iter().zip(b.voxels()) {
        intersection += (x && y) as usize;
        total += x as usize + y as usize;
    }
    if total == 0 {
        return Ok(0.0);
    }
    Ok(2.0 * intersection as f64 / total as f64)
}

/// Dice of a scan mask against a reference, resampling the reference onto
/// the scan grid when the two differ.
pub fn dice_with_reference(scan: &MaskVolume, reference: &MaskVolume) -> Result<f64> {
    if scan.same_grid(reference) {
        return dice_coefficient(scan, reference);
    }
    let resampled = reference.resample_like(scan)?;
    dice_coefficient(scan, &resampled)
}
