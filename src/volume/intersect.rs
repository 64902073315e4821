use std::collections::VecDeque;

use anyhow::{Result, bail};

use crate::error::QcError;
use crate::volume::MaskVolume;

const MAX_THRESHOLD: f64 = 1.0 - 1.0e-7;

/// Voxel-wise vote across masks: a voxel is kept when it is inside more
/// than `threshold * n` of the `n` masks. A threshold of 1 yields the
/// strict intersection. All masks must share shape and affine.
pub fn intersect_masks(masks: &[MaskVolume], threshold: f64, connected: bool) -> Result<MaskVolume> {
    let Some(first) = masks.first() else {
        return Err(QcError::NoInputScans("no masks provided for intersection".to_string()).into());
    };
    if !(0.0..=1.0).contains(&threshold) {
        bail!("intersection threshold must lie in [0, 1], got {}", threshold);
    }
    for (i, mask) in masks.iter().enumerate().skip(1) {
        if !mask.same_grid(first) {
            return Err(QcError::GeometryMismatch(format!(
                "mask {} does not share shape/affine with the first mask ({:?} vs {:?})",
                i,
                mask.dims(),
                first.dims()
            ))
            .into());
        }
    }

    let mut votes = vec![0u32; first.len()];
    for mask in masks {
        for (vote, &inside) in votes.iter_mut().zip(mask.voxels()) {
            *vote += inside as u32;
        }
    }

    let cutoff = threshold.min(MAX_THRESHOLD) * masks.len() as f64;
    let voxels: Vec<bool> = votes.iter().map(|&v| v as f64 > cutoff).collect();
    let group = MaskVolume::new(first.dims(), *first.affine(), voxels)?;

    if connected && group.count() > 0 {
        return Ok(largest_connected_component(&group));
    }
    Ok(group)
}

/// Largest 6-connected component of the mask. Ties go to the component
/// reached first in storage order.
pub fn largest_connected_component(mask: &MaskVolume) -> MaskVolume {
    let [nx, ny, nz] = mask.dims();
    let mut labels = vec![0u32; mask.len()];
    let mut best_label = 0u32;
    let mut best_size = 0usize;
    let mut next_label = 0u32;
    let mut queue = VecDeque::new();

    for start in 0..mask.len() {
        if !mask.voxels()[start] || labels[start] != 0 {
            continue;
        }
        next_label += 1;
        labels[start] = next_label;
        queue.push_back(start);
        let mut size = 0usize;

        while let Some(idx) = queue.pop_front() {
            size += 1;
            let i = idx % nx;
            let j = (idx / nx) % ny;
            let k = idx / (nx * ny);
            let mut neighbours = [None; 6];
            if i > 0 {
                neighbours[0] = Some(idx - 1);
            }
            if i + 1 < nx {
                neighbours[1] = Some(idx + 1);
            }
            if j > 0 {
                neighbours[2] = Some(idx - nx);
            }
            if j + 1 < ny {
                neighbours[3] = Some(idx + nx);
            }
            if k > 0 {
                neighbours[4] = Some(idx - nx * ny);
            }
            if k + 1 < nz {
                neighbours[5] = Some(idx + nx * ny);
            }
            for n in neighbours.into_iter().flatten() {
                if mask.voxels()[n] && labels[n] == 0 {
                    labels[n] = next_label;
                    queue.push_back(n);
                }
            }
        }

        if size > best_size {
            best_size = size;
            best_label = next_label;
        }
    }

    let voxels = labels
        .iter()
        .map(|&l| best_label != 0 && l == best_label)
        .collect();
    MaskVolume {
        dims: mask.dims(),
        affine: *mask.affine(),
        voxels,
    }
}
