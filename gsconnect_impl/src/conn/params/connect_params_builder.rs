use super::cp_url::format_as_url;
use crate::{url, ConnectParams, GsError, GsResult, IntoConnectParamsBuilder};
use secstr::SecUtf8;
use std::time::Duration;
use time::{macros::format_description, UtcOffset};

/// A builder for `ConnectParams`.
///
/// # Instantiating a `ConnectParamsBuilder` programmatically
///
/// ```rust
/// use gsconnect::ConnectParams;
///
/// let connect_params = ConnectParams::builder()
///     .scheme("loopback")
///     .hostname("abcd123")
///     .port(10001)
///     .cluster_name("myCluster")
///     .user("admin")
///     .password("schlau")
///     .build()
///     .unwrap();
/// ```
///
/// # Instantiating a `ConnectParamsBuilder` from a URL
///
/// See module [`url`](crate::url) for details about the supported URLs.
///
/// ```rust
/// use gsconnect::IntoConnectParamsBuilder;
///
/// let conn_params = "loopback://abcd123:10001/myCluster"
///     .into_connect_params_builder()
///     .unwrap()
///     .user("admin")
///     .password("schlau")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(into = "String")]
pub struct ConnectParamsBuilder {
    scheme: Option<String>,
    hostname: Option<String>,
    port: Option<u16>,
    user: Option<String>,
    #[serde(skip)]
    password: Option<SecUtf8>,
    cluster_name: Option<String>,
    database: Option<String>,
    login_timeout: Option<Duration>,
    application_name: Option<String>,
    time_zone: Option<String>,
}

impl ConnectParamsBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scheme, which selects the driver.
    pub fn scheme<S: AsRef<str>>(&mut self, scheme: S) -> &mut Self {
        self.scheme = Some(scheme.as_ref().to_owned());
        self
    }

    /// Sets the hostname.
    pub fn hostname<H: AsRef<str>>(&mut self, hostname: H) -> &mut Self {
        self.hostname = Some(hostname.as_ref().to_owned());
        self
    }

    /// Sets the port.
    pub fn port(&mut self, port: u16) -> &mut Self {
        self.port = Some(port);
        self
    }

    /// Sets the database user.
    pub fn user<D: AsRef<str>>(&mut self, user: D) -> &mut Self {
        self.user = Some(user.as_ref().to_owned());
        self
    }

    /// Sets the password.
    pub fn password<P: AsRef<str>>(&mut self, pw: P) -> &mut Self {
        self.password = Some(SecUtf8::from(pw.as_ref()));
        self
    }

    /// Unsets the password.
    pub fn unset_password(&mut self) -> &mut Self {
        self.password = None;
        self
    }

    /// Sets the cluster name.
    pub fn cluster_name<C: AsRef<str>>(&mut self, cluster_name: C) -> &mut Self {
        self.cluster_name = Some(cluster_name.as_ref().to_owned());
        self
    }

    /// Sets the database within the cluster.
    pub fn database<D: AsRef<str>>(&mut self, database: D) -> &mut Self {
        self.database = Some(database.as_ref().to_owned());
        self
    }

    /// Sets the login timeout.
    pub fn login_timeout(&mut self, login_timeout: Duration) -> &mut Self {
        self.login_timeout = Some(login_timeout);
        self
    }

    /// Sets the application name.
    pub fn application_name<A: AsRef<str>>(&mut self, application_name: A) -> &mut Self {
        self.application_name = Some(application_name.as_ref().to_owned());
        self
    }

    /// Sets the time zone of the session, as `Z` or as `±HH:MM`.
    ///
    /// The value is validated by [`build`](ConnectParamsBuilder::build).
    pub fn time_zone<T: AsRef<str>>(&mut self, time_zone: T) -> &mut Self {
        self.time_zone = Some(time_zone.as_ref().to_owned());
        self
    }

    /// Constructs a `ConnectParams` from the builder.
    ///
    /// # Errors
    /// `GsError::Usage` if the builder was not yet configured to
    /// create a meaningful `ConnectParams`
    ///
    /// `GsError::ConnParams` if the time zone is neither `Z` nor of the form `±HH:MM`
    pub fn build(&self) -> GsResult<ConnectParams> {
        let scheme = self
            .scheme
            .clone()
            .ok_or(GsError::Usage("scheme is missing"))?;

        let host = self
            .hostname
            .clone()
            .ok_or(GsError::Usage("hostname is missing"))?;

        let port = self.port.ok_or(GsError::Usage("port is missing"))?;

        let user = self.user.clone().ok_or(GsError::Usage("user is missing"))?;

        let password = self
            .password
            .clone()
            .ok_or(GsError::Usage("password is missing"))?;

        let time_zone = self
            .time_zone
            .as_deref()
            .map(|tz| parse_time_zone(tz).map(|offset| (tz.to_string(), offset)))
            .transpose()?;

        Ok(ConnectParams::new(
            scheme,
            host,
            port,
            user,
            password,
            self.cluster_name.clone().unwrap_or_default(),
            self.database
                .clone()
                .unwrap_or_else(|| url::DEFAULT_DATABASE.to_string()),
            self.login_timeout
                .unwrap_or(Duration::from_secs(url::DEFAULT_LOGIN_TIMEOUT)),
            self.application_name.clone(),
            time_zone,
        ))
    }

    /// Returns the url for this connection, without the password.
    ///
    /// # Errors
    ///
    /// `GsError::Usage` if the builder was not yet configured to build a correct url
    pub fn to_url(&self) -> GsResult<String> {
        if self.scheme.is_none() || self.hostname.is_none() || self.port.is_none() {
            return Err(GsError::Usage("scheme, hostname and port are required"));
        }
        Ok(self.to_string())
    }

    /// Getter
    pub fn get_scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Getter
    pub fn get_hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    /// Getter
    pub fn get_user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Getter
    pub fn get_password(&self) -> Option<&SecUtf8> {
        self.password.as_ref()
    }

    /// Getter
    pub fn get_port(&self) -> Option<u16> {
        self.port
    }

    /// Getter
    pub fn get_cluster_name(&self) -> Option<&str> {
        self.cluster_name.as_deref()
    }

    /// Getter
    pub fn get_database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Getter
    pub fn get_login_timeout(&self) -> Option<Duration> {
        self.login_timeout
    }
}

fn parse_time_zone(time_zone: &str) -> GsResult<UtcOffset> {
    if time_zone == "Z" {
        return Ok(UtcOffset::UTC);
    }
    UtcOffset::parse(
        time_zone,
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .map_err(|e| {
        GsError::conn_params(
            format!("invalid value '{time_zone}' for {}: {e}", url::TIME_ZONE).into(),
        )
    })
}

impl<'de> serde::de::Deserialize<'de> for ConnectParamsBuilder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        let visitor = Visitor();
        deserializer.deserialize_str(visitor)
    }
}

struct Visitor();
impl<'de> serde::de::Visitor<'de> for Visitor {
    type Value = ConnectParamsBuilder;
    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a String in the form of a url")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        IntoConnectParamsBuilder::into_connect_params_builder(v).map_err(E::custom)
    }
}

impl From<ConnectParamsBuilder> for String {
    fn from(mut cpb: ConnectParamsBuilder) -> String {
        cpb.unset_password();
        cpb.to_string()
    }
}

impl std::fmt::Display for ConnectParamsBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        format_as_url(
            self.scheme.as_deref().unwrap_or(""),
            &format!(
                "{}:{}",
                self.hostname.as_deref().unwrap_or(""),
                self.port.unwrap_or_default()
            ),
            self.user.as_deref().unwrap_or(""),
            self.cluster_name.as_deref().unwrap_or(""),
            self.database.as_deref().unwrap_or(url::DEFAULT_DATABASE),
            self.login_timeout
                .unwrap_or(Duration::from_secs(url::DEFAULT_LOGIN_TIMEOUT)),
            self.application_name.as_deref(),
            self.time_zone.as_deref(),
            f,
        )
    }
}
