mod common;

use fmriprep_autoqc::error::QcError;
use fmriprep_autoqc::volume::{Affine, MaskVolume, resample_nearest, scaled_affine};

use common::{DIMS, cube};

#[test]
fn upsampling_rounds_to_nearest_source_voxel() {
    let source = cube(1, 9);
    let target = resample_nearest(&source, [20, 20, 20], &scaled_affine([1.0, 1.0, 1.0])).unwrap();
    assert_eq!(target.dims(), [20, 20, 20]);
    // fine voxels 1..17 land on coarse voxels 1..9 on every axis
    assert_eq!(target.count(), 16 * 16 * 16);
    assert!(!target.get(0, 5, 5));
    assert!(target.get(1, 5, 5));
    assert!(target.get(16, 5, 5));
    assert!(!target.get(17, 5, 5));
}

#[test]
fn shifted_grid_moves_the_mask() {
    let source = cube(1, 9);
    let mut shifted = scaled_affine([2.0, 2.0, 2.0]);
    shifted[(0, 3)] = 2.0;
    shifted[(1, 3)] = 2.0;
    shifted[(2, 3)] = 2.0;
    let target = resample_nearest(&source, DIMS, &shifted).unwrap();
    assert_eq!(target.count(), 512);
    assert!(target.get(0, 0, 0));
    assert!(!target.get(8, 0, 0));
}

#[test]
fn outside_source_grid_is_empty() {
    let source = cube(1, 9);
    let mut far = scaled_affine([2.0, 2.0, 2.0]);
    far[(0, 3)] = 500.0;
    let target = resample_nearest(&source, DIMS, &far).unwrap();
    assert_eq!(target.count(), 0);
}

#[test]
fn same_grid_resample_is_a_copy() {
    let source = cube(2, 6);
    let copy = source.resample_like(&cube(1, 9)).unwrap();
    assert_eq!(copy, source);
}

#[test]
fn singular_source_affine_is_rejected() {
    let source = MaskVolume::empty(DIMS, Affine::zeros());
    let err = resample_nearest(&source, DIMS, &scaled_affine([1.0, 1.0, 1.0])).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<QcError>(),
        Some(QcError::GeometryMismatch(_))
    ));
}
