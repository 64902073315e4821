use crate::bids::BidsName;

/// Entity query against a dataset. Empty lists and `None` fields do not
/// constrain; a set field requires the file to carry that entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityFilter {
    pub subjects: Vec<String>,
    pub tasks: Vec<String>,
    pub space: Option<String>,
    pub desc: Option<String>,
    pub suffix: Option<String>,
    pub extension: Option<String>,
    pub datatype: Option<String>,
}

impl EntityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subjects<I, S>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subjects = subjects.into_iter().map(Into::into).collect();
        self
    }

    pub fn tasks<I, S>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tasks = tasks.into_iter().map(Into::into).collect();
        self
    }

    pub fn space(mut self, space: &str) -> Self {
        self.space = Some(space.to_string());
        self
    }

    pub fn desc(mut self, desc: &str) -> Self {
        self.desc = Some(desc.to_string());
        self
    }

    pub fn suffix(mut self, suffix: &str) -> Self {
        self.suffix = Some(suffix.to_string());
        self
    }

    pub fn extension(mut self, extension: &str) -> Self {
        self.extension = Some(extension.to_string());
        self
    }

    pub fn datatype(mut self, datatype: &str) -> Self {
        self.datatype = Some(datatype.to_string());
        self
    }

    pub fn matches(&self, name: &BidsName, datatype: Option<&str>) -> bool {
        if !matches_any(&self.subjects, name.get("sub")) {
            return false;
        }
        if !matches_any(&self.tasks, name.get("task")) {
            return false;
        }
        if !matches_one(self.space.as_deref(), name.get("space")) {
            return false;
        }
        if !matches_one(self.desc.as_deref(), name.get("desc")) {
            return false;
        }
        if !matches_one(self.suffix.as_deref(), name.suffix.as_deref()) {
            return false;
        }
        if let Some(ext) = &self.extension {
            if trim_dot(ext) != trim_dot(&name.extension) {
                return false;
            }
        }
        matches_one(self.datatype.as_deref(), datatype)
    }
}

fn matches_any(accepted: &[String], value: Option<&str>) -> bool {
    if accepted.is_empty() {
        return true;
    }
    match value {
        Some(v) => accepted.iter().any(|a| a == v),
        None => false,
    }
}

fn matches_one(accepted: Option<&str>, value: Option<&str>) -> bool {
    match accepted {
        None => true,
        Some(a) => value == Some(a),
    }
}

fn trim_dot(ext: &str) -> &str {
    ext.strip_prefix('.').unwrap_or(ext)
}
