//! NIfTI-1 mask I/O.
//!
//! Reading goes through the `nifti` crate (`.nii` and `.nii.gz`); 4D inputs
//! are reduced to their first volume. Writing emits a single-file NIfTI-1
//! with uint8 voxels, gzip-compressed when the path ends in `.gz`.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use flate2::Compression;
use flate2::write::GzEncoder;
use ndarray::{Axis, Ix3};
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};

use crate::volume::{Affine, MaskVolume};

const HEADER_SIZE: usize = 348;
const VOX_OFFSET: usize = 352;
const DT_UINT8: i16 = 2;

pub fn read_mask(path: &Path) -> Result<MaskVolume> {
    let obj = ReaderOptions::new()
        .read_file(path)
        .with_context(|| format!("failed to read NIfTI {}", path.display()))?;
    let affine = affine_from_header(obj.header());

    let mut array = obj
        .into_volume()
        .into_ndarray::<f64>()
        .with_context(|| format!("failed to decode voxels of {}", path.display()))?;
    if array.ndim() < 3 {
        bail!(
            "{}: expected at least a 3D volume, got {}D",
            path.display(),
            array.ndim()
        );
    }
    while array.ndim() > 3 {
        let last = array.ndim() - 1;
        array = array.index_axis_move(Axis(last), 0);
    }

    let array = array
        .into_dimensionality::<Ix3>()
        .with_context(|| format!("{}: volume is not 3D", path.display()))?;
    let (nx, ny, nz) = array.dim();
    let dims = [nx, ny, nz];
    // Nonzero means inside, NaN included.
    let mask = MaskVolume::from_fn(dims, affine, |i, j, k| array[[i, j, k]] != 0.0);
    Ok(mask)
}

pub fn write_mask(path: &Path, mask: &MaskVolume) -> Result<()> {
    let bytes = encode_mask(mask)?;
    let gzip = path.extension().and_then(|s| s.to_str()) == Some("gz");
    let payload = if gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&bytes)?;
        encoder.finish()?
    } else {
        bytes
    };
    std::fs::write(path, payload).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn encode_mask(mask: &MaskVolume) -> Result<Vec<u8>> {
    let [nx, ny, nz] = mask.dims();
    let mut dim = [3i16, 1, 1, 1, 1, 1, 1, 1];
    for (slot, n) in dim[1..4].iter_mut().zip([nx, ny, nz]) {
        *slot = i16::try_from(n).context("mask dimension exceeds NIfTI-1 limit")?;
    }

    let affine = mask.affine();
    let voxel_size = [
        column_norm(affine, 0),
        column_norm(affine, 1),
        column_norm(affine, 2),
    ];

    let mut header = [0u8; HEADER_SIZE];
    header[0..4].copy_from_slice(&(HEADER_SIZE as i32).to_le_bytes());
    for (i, d) in dim.iter().enumerate() {
        let offset = 40 + i * 2;
        header[offset..offset + 2].copy_from_slice(&d.to_le_bytes());
    }
    header[70..72].copy_from_slice(&DT_UINT8.to_le_bytes());
    header[72..74].copy_from_slice(&8i16.to_le_bytes());

    let pixdim = [
        1.0f32,
        voxel_size[0] as f32,
        voxel_size[1] as f32,
        voxel_size[2] as f32,
        1.0,
        1.0,
        1.0,
        1.0,
    ];
    for (i, p) in pixdim.iter().enumerate() {
        let offset = 76 + i * 4;
        header[offset..offset + 4].copy_from_slice(&p.to_le_bytes());
    }
    header[108..112].copy_from_slice(&(VOX_OFFSET as f32).to_le_bytes());
    header[112..116].copy_from_slice(&1.0f32.to_le_bytes());
    // sform_code = 4 (MNI152)
    header[254..256].copy_from_slice(&4i16.to_le_bytes());
    for row in 0..3 {
        for col in 0..4 {
            let offset = 280 + row * 16 + col * 4;
            header[offset..offset + 4]
                .copy_from_slice(&(affine[(row, col)] as f32).to_le_bytes());
        }
    }
    header[344..348].copy_from_slice(b"n+1\0");

    let mut buffer = Vec::with_capacity(VOX_OFFSET + mask.len());
    buffer.extend_from_slice(&header);
    buffer.extend_from_slice(&[0u8; VOX_OFFSET - HEADER_SIZE]);
    buffer.extend(mask.voxels().iter().map(|&v| v as u8));
    Ok(buffer)
}

/// sform when present, then qform, then voxel scaling only.
pub fn affine_from_header(header: &NiftiHeader) -> Affine {
    if header.sform_code > 0 {
        let rows = [header.srow_x, header.srow_y, header.srow_z];
        let mut affine = Affine::identity();
        for (r, row) in rows.iter().enumerate() {
            for c in 0..4 {
                affine[(r, c)] = row[c] as f64;
            }
        }
        return affine;
    }

    let pixdim = [
        header.pixdim[1] as f64,
        header.pixdim[2] as f64,
        header.pixdim[3] as f64,
    ];
    if header.qform_code > 0 {
        let b = header.quatern_b as f64;
        let c = header.quatern_c as f64;
        let d = header.quatern_d as f64;
        let a = (1.0 - (b * b + c * c + d * d)).max(0.0).sqrt();
        let qfac = if (header.pixdim[0] as f64) < 0.0 { -1.0 } else { 1.0 };
        let rotation = [
            [a * a + b * b - c * c - d * d, 2.0 * (b * c - a * d), 2.0 * (b * d + a * c)],
            [2.0 * (b * c + a * d), a * a + c * c - b * b - d * d, 2.0 * (c * d - a * b)],
            [2.0 * (b * d - a * c), 2.0 * (c * d + a * b), a * a + d * d - b * b - c * c],
        ];
        let scale = [pixdim[0], pixdim[1], qfac * pixdim[2]];
        let offset = [
            header.quatern_x as f64,
            header.quatern_y as f64,
            header.quatern_z as f64,
        ];
        let mut affine = Affine::identity();
        for r in 0..3 {
            for c in 0..3 {
                affine[(r, c)] = rotation[r][c] * scale[c];
            }
            affine[(r, 3)] = offset[r];
        }
        return affine;
    }

    crate::volume::scaled_affine(pixdim)
}

fn column_norm(affine: &Affine, col: usize) -> f64 {
    (0..3)
        .map(|r| affine[(r, col)] * affine[(r, col)])
        .sum::<f64>()
        .sqrt()
}
