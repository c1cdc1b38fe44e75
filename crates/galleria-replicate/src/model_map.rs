use crate::error::ReplicateError;

/// Where a canonical model id is sent.
///
/// * `owner/name` – official model endpoint, latest version.
/// * `owner/name:version` – pinned version via the generic predictions endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub version: Option<&'a str>,
}

impl<'a> ModelRef<'a> {
    pub fn parse(model: &'a str) -> Result<Self, ReplicateError> {
        map_model(model)
    }
}

pub(crate) fn map_model(model: &str) -> Result<ModelRef<'_>, ReplicateError> {
    let (path, version) = match model.split_once(':') {
        Some((path, version)) => (path, Some(version)),
        None => (model, None),
    };

    let Some((owner, name)) = path.split_once('/') else {
        return Err(ReplicateError::InvalidModel(model.to_owned()));
    };

    let segment_ok = |s: &str| !s.is_empty() && !s.contains('/');
    if !segment_ok(owner) || !segment_ok(name) || version.is_some_and(str::is_empty) {
        return Err(ReplicateError::InvalidModel(model.to_owned()));
    }

    Ok(ModelRef {
        owner,
        name,
        version,
    })
}
