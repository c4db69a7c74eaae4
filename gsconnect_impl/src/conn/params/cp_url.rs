use crate::url;
use std::time::Duration;

#[allow(clippy::too_many_arguments)]
pub(crate) fn format_as_url(
    scheme: &str,
    addr: &str,
    user: &str,
    cluster_name: &str,
    database: &str,
    login_timeout: Duration,
    application_name: Option<&str>,
    time_zone: Option<&str>,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    write!(f, "{scheme}://")?;
    if !user.is_empty() {
        write!(f, "{user}@")?;
    }
    write!(f, "{addr}")?;

    if database != url::DEFAULT_DATABASE {
        write!(f, "/{cluster_name}/{database}")?;
    } else if !cluster_name.is_empty() {
        write!(f, "/{cluster_name}")?;
    }

    let mut sep = std::iter::repeat(())
        .enumerate()
        .map(|(i, ())| if i == 0 { "?" } else { "&" });

    if login_timeout.as_secs() != url::DEFAULT_LOGIN_TIMEOUT {
        write!(
            f,
            "{}{}={}",
            sep.next().unwrap_or("&"),
            UrlOpt::LoginTimeout,
            login_timeout.as_secs()
        )?;
    }
    if let Some(an) = application_name {
        write!(
            f,
            "{}{}={an}",
            sep.next().unwrap_or("&"),
            UrlOpt::ApplicationName
        )?;
    }
    if let Some(tz) = time_zone {
        write!(f, "{}{}={tz}", sep.next().unwrap_or("&"), UrlOpt::TimeZone)?;
    }
    Ok(())
}

pub(crate) enum UrlOpt {
    User,
    Password,
    LoginTimeout,
    ApplicationName,
    TimeZone,
}
impl UrlOpt {
    pub fn from(s: &str) -> Option<Self> {
        match s {
            url::USER => Some(UrlOpt::User),
            url::PASSWORD => Some(UrlOpt::Password),
            url::LOGIN_TIMEOUT => Some(UrlOpt::LoginTimeout),
            url::APPLICATION_NAME => Some(UrlOpt::ApplicationName),
            url::TIME_ZONE => Some(UrlOpt::TimeZone),
            _ => None,
        }
    }
}
impl std::fmt::Display for UrlOpt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                UrlOpt::User => url::USER,
                UrlOpt::Password => url::PASSWORD,
                UrlOpt::LoginTimeout => url::LOGIN_TIMEOUT,
                UrlOpt::ApplicationName => url::APPLICATION_NAME,
                UrlOpt::TimeZone => url::TIME_ZONE,
            }
        )
    }
}
