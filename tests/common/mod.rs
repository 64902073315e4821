#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use fmriprep_autoqc::template::TEMPLATE;
use fmriprep_autoqc::volume::nifti_io::write_mask;
use fmriprep_autoqc::volume::{MaskVolume, scaled_affine};

pub const DIMS: [usize; 3] = [10, 10, 10];

/// Axis-aligned box `lo..hi` on every axis of a 2 mm grid.
pub fn cube(lo: usize, hi: usize) -> MaskVolume {
    MaskVolume::from_fn(DIMS, scaled_affine([2.0, 2.0, 2.0]), |i, j, k| {
        (lo..hi).contains(&i) && (lo..hi).contains(&j) && (lo..hi).contains(&k)
    })
}

/// Box `1..9` with the first `drop` x-slices cleared.
pub fn trimmed(drop: usize) -> MaskVolume {
    MaskVolume::from_fn(DIMS, scaled_affine([2.0, 2.0, 2.0]), |i, j, k| {
        i >= 1 + drop && i < 9 && (1..9).contains(&j) && (1..9).contains(&k)
    })
}

pub fn write_template(home: &Path, mask: &MaskVolume) -> PathBuf {
    let dir = home.join(format!("tpl-{}", TEMPLATE));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("tpl-{}_res-01_desc-brain_mask.nii.gz", TEMPLATE));
    write_mask(&path, mask).unwrap();
    path
}

pub fn write_anat_mask(root: &Path, sub: &str, mask: &MaskVolume) -> PathBuf {
    let dir = root.join(format!("sub-{}", sub)).join("anat");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!(
        "sub-{}_space-{}_desc-brain_mask.nii.gz",
        sub, TEMPLATE
    ));
    write_mask(&path, mask).unwrap();
    path
}

pub fn write_func_mask(root: &Path, sub: &str, task: &str, mask: &MaskVolume) -> PathBuf {
    let dir = root.join(format!("sub-{}", sub)).join("func");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!(
        "sub-{}_task-{}_space-{}_desc-brain_mask.nii.gz",
        sub, task, TEMPLATE
    ));
    write_mask(&path, mask).unwrap();
    path
}

/// Confounds file with a framewise displacement column; `None` is `n/a`.
pub fn write_confounds(root: &Path, sub: &str, task: &str, fd: &[Option<f64>]) -> PathBuf {
    let dir = root.join(format!("sub-{}", sub)).join("func");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!(
        "sub-{}_task-{}_desc-confounds_timeseries.tsv",
        sub, task
    ));
    let mut body = String::from("global_signal\tframewise_displacement\n");
    for (i, v) in fd.iter().enumerate() {
        let value = match v {
            Some(v) => format!("{}", v),
            None => "n/a".to_string(),
        };
        body.push_str(&format!("{}.5\t{}\n", 100 + i, value));
    }
    fs::write(&path, body).unwrap();
    path
}

/// 8 low-motion volumes (0.1 mm) and 2 spikes; mean is `0.08 + spike / 5`.
pub fn fd_series(spike: f64) -> Vec<Option<f64>> {
    let mut fd = vec![Some(0.1); 8];
    fd.push(Some(spike));
    fd.push(Some(spike));
    fd
}

/// Two subjects, task `rest`. sub-01 is clean (mean FD 0.3), sub-02 moves
/// too much (mean FD 0.6). Every mask equals the template mask.
pub fn write_dataset(root: &Path, home: &Path) {
    let brain = cube(1, 9);
    write_template(home, &brain);
    for (sub, spike) in [("01", 1.1), ("02", 2.6)] {
        write_anat_mask(root, sub, &brain);
        write_func_mask(root, sub, "rest", &brain);
        write_confounds(root, sub, "rest", &fd_series(spike));
    }
    fs::write(root.join("dataset_description.json"), "{\"Name\": \"fMRIPrep\"}").unwrap();
}
