use reqwest::Url;

use crate::error::CoreError;

/// Credentials sent as HTTP basic auth. Empty strings count as unset so a
/// configuration with `"rpc_user": ""` behaves like one without the key.
pub(super) fn resolve_auth(
    user: Option<&str>,
    pass: Option<&str>,
) -> Result<Option<(String, String)>, CoreError> {
    let user = user.filter(|u| !u.is_empty());
    let pass = pass.filter(|p| !p.is_empty());
    match (user, pass) {
        (Some(u), Some(p)) => Ok(Some((u.to_owned(), p.to_owned()))),
        (Some(_), None) | (None, Some(_)) => Err(CoreError::Config(
            "both rpc user and rpc pass must be set together".to_owned(),
        )),
        (None, None) => Ok(None),
    }
}

pub(super) fn parse_connection(connection: &str) -> Result<Url, CoreError> {
    let parsed = Url::parse(connection).map_err(|e| {
        CoreError::Config(format!(
            "invalid rpc url `{connection}`: expected HTTP(S) URL ({e})"
        ))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(CoreError::Config(format!(
            "unsupported rpc url scheme `{other}`; expected http or https"
        ))),
    }
}

pub(super) fn validate_timeout(secs: u64) -> Result<(), CoreError> {
    if secs == 0 {
        return Err(CoreError::Config(
            "rpc timeout must be at least 1 second".to_owned(),
        ));
    }
    Ok(())
}
