use crate::error::{BridgeError, BridgeResult};
use crate::types::FieldMapping;

use log::debug;
use serde_json::Value;
use strum::{Display, EnumString};
use url::Url;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use std::{env, fs};

pub const WUFOO_SUBDOMAIN: &str = "WUFOO_SUBDOMAIN";
pub const WUFOO_API_KEY: &str = "WUFOO_API_KEY";
pub const WUFOO_FORM_ID: &str = "WUFOO_FORM_ID";
pub const WUFOO_BASE_URL: &str = "WUFOO_BASE_URL";
pub const DOCUSEAL_API_KEY: &str = "DOCUSEAL_API_KEY";
pub const DOCUSEAL_TEMPLATE_ID: &str = "DOCUSEAL_TEMPLATE_ID";
pub const DOCUSEAL_API_URL: &str = "DOCUSEAL_API_URL";
pub const FORMSIGN_PROFILE: &str = "FORMSIGN_PROFILE";
pub const FIRST_NAME_FIELD: &str = "FIRST_NAME_FIELD";
pub const LAST_NAME_FIELD: &str = "LAST_NAME_FIELD";
pub const EMAIL_FIELD: &str = "EMAIL_FIELD";
pub const IDENTIFICATION_TYPE_FIELD: &str = "IDENTIFICATION_TYPE_FIELD";
pub const IDENTIFICATION_NUMBER_FIELD: &str = "IDENTIFICATION_NUMBER_FIELD";
pub const ROLE_LABEL: &str = "ROLE_LABEL";
pub const SEND_EMAIL: &str = "SEND_EMAIL";
pub const REDIRECT_STATUS: &str = "REDIRECT_STATUS";
pub const ENTRY_QUERY_PARAM: &str = "ENTRY_QUERY_PARAM";
pub const STRICT_REQUIRED_FIELDS: &str = "STRICT_REQUIRED_FIELDS";
pub const ERROR_STATUS_MODE: &str = "ERROR_STATUS_MODE";
pub const REQUEST_TIMEOUT_MS: &str = "REQUEST_TIMEOUT_MS";

pub const DEFAULT_DOCUSEAL_API_URL: &str = "https://api.docuseal.com";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;
pub const MAX_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Named preset of pipeline parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum Profile {
    #[strum(ascii_case_insensitive, to_string = "signer")]
    Signer,

    #[strum(
        ascii_case_insensitive,
        serialize = "firstparty",
        serialize = "first-party",
        to_string = "first_party"
    )]
    FirstParty,
}

struct ProfilePreset {
    role_label: &'static str,
    send_email: bool,
    redirect_status: u16,
    query_param_name: &'static str,
    // None means the name/email field ids must come from configuration
    default_fields: Option<[&'static str; 3]>,
    requires_identification: bool,
}

impl Profile {
    fn preset(self) -> ProfilePreset {
        match self {
            Profile::Signer => ProfilePreset {
                role_label: "Signer",
                send_email: false,
                redirect_status: 302,
                query_param_name: "entryId",
                default_fields: None,
                requires_identification: true,
            },
            Profile::FirstParty => ProfilePreset {
                role_label: "First Party",
                send_email: true,
                redirect_status: 301,
                query_param_name: "entry",
                default_fields: Some(["Field6", "Field7", "Field9"]),
                requires_identification: false,
            },
        }
    }
}

/// How pipeline failures are turned into status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum ErrorStatusMode {
    /// Every failure is reported as 500
    #[strum(ascii_case_insensitive, to_string = "uniform")]
    Uniform,

    /// Validation 422, not found 404, upstream 502, configuration 500
    #[strum(ascii_case_insensitive, to_string = "classified")]
    Classified,
}

#[derive(Clone)]
pub struct FormProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub form_id: String,
}

impl fmt::Debug for FormProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***REDACTED***")
            .field("form_id", &self.form_id)
            .finish()
    }
}

#[derive(Clone)]
pub struct SigningServiceConfig {
    pub base_url: String,
    pub api_key: String,
}

impl fmt::Debug for SigningServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningServiceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***REDACTED***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappingSettings {
    /// Raw template id, parsed when a payload is built
    pub template_id: String,
    pub first_name_field: String,
    pub last_name_field: String,
    pub email_field: String,
    pub id_type_field: Option<String>,
    pub id_number_field: Option<String>,
    pub field_table: Vec<FieldMapping>,
    pub role_label: String,
    pub send_email: bool,
    pub strict_required_fields: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandlerSettings {
    pub query_param_name: String,
    pub redirect_status: u16,
    pub error_status_mode: ErrorStatusMode,
}

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub profile: Profile,
    pub form_provider: FormProviderConfig,
    pub signing_service: SigningServiceConfig,
    pub mapping: MappingSettings,
    pub handler: HandlerSettings,
    pub request_timeout: Duration,
}

impl BridgeConfig {
    /// Reads every setting from the process environment.
    pub fn from_env() -> BridgeResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as absent. Required keys fail with
    /// [`BridgeError::Configuration`] naming the missing key.
    pub fn from_lookup<F>(lookup: F) -> BridgeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &str| {
            get(key).ok_or_else(|| {
                BridgeError::config(format!("Missing required setting: {}", key))
            })
        };

        let profile = match get(FORMSIGN_PROFILE) {
            Some(raw) => raw.parse::<Profile>().map_err(|_| {
                BridgeError::config(format!(
                    "Invalid value '{}' for {}, expected: signer or first_party",
                    raw, FORMSIGN_PROFILE
                ))
            })?,
            None => Profile::Signer,
        };
        let preset = profile.preset();
        debug!("Loading configuration for profile: {}", profile);

        let form_base = match get(WUFOO_BASE_URL) {
            Some(base) => base,
            None => format!("https://{}.wufoo.com", require(WUFOO_SUBDOMAIN)?),
        };
        let form_provider = FormProviderConfig {
            base_url: normalize_base_url(WUFOO_BASE_URL, &form_base)?,
            api_key: require(WUFOO_API_KEY)?,
            form_id: require(WUFOO_FORM_ID)?,
        };

        let signing_base =
            get(DOCUSEAL_API_URL).unwrap_or_else(|| DEFAULT_DOCUSEAL_API_URL.to_string());
        let signing_service = SigningServiceConfig {
            base_url: normalize_base_url(DOCUSEAL_API_URL, &signing_base)?,
            api_key: require(DOCUSEAL_API_KEY)?,
        };

        let (first_name_field, last_name_field, email_field) = match preset.default_fields {
            Some([first, last, email]) => (
                get(FIRST_NAME_FIELD).unwrap_or_else(|| first.to_string()),
                get(LAST_NAME_FIELD).unwrap_or_else(|| last.to_string()),
                get(EMAIL_FIELD).unwrap_or_else(|| email.to_string()),
            ),
            None => (
                require(FIRST_NAME_FIELD)?,
                require(LAST_NAME_FIELD)?,
                require(EMAIL_FIELD)?,
            ),
        };
        let (id_type_field, id_number_field) = if preset.requires_identification {
            (
                Some(require(IDENTIFICATION_TYPE_FIELD)?),
                Some(require(IDENTIFICATION_NUMBER_FIELD)?),
            )
        } else {
            (get(IDENTIFICATION_TYPE_FIELD), get(IDENTIFICATION_NUMBER_FIELD))
        };

        let mut field_table = vec![
            FieldMapping::new(&first_name_field, "First Name"),
            FieldMapping::new(&last_name_field, "Last Name"),
            FieldMapping::new(&email_field, "Email"),
        ];
        if let Some(field) = &id_type_field {
            field_table.push(FieldMapping::new(field, "ID Type"));
        }
        if let Some(field) = &id_number_field {
            field_table.push(FieldMapping::new(field, "ID Number"));
        }

        let mapping = MappingSettings {
            template_id: require(DOCUSEAL_TEMPLATE_ID)?,
            first_name_field,
            last_name_field,
            email_field,
            id_type_field,
            id_number_field,
            field_table,
            role_label: get(ROLE_LABEL).unwrap_or_else(|| preset.role_label.to_string()),
            send_email: get(SEND_EMAIL)
                .map(|v| parse_bool(SEND_EMAIL, &v))
                .transpose()?
                .unwrap_or(preset.send_email),
            strict_required_fields: get(STRICT_REQUIRED_FIELDS)
                .map(|v| parse_bool(STRICT_REQUIRED_FIELDS, &v))
                .transpose()?
                .unwrap_or(false),
        };

        let redirect_status = match get(REDIRECT_STATUS) {
            Some(raw) => match raw.as_str() {
                "301" => 301,
                "302" => 302,
                _ => {
                    return Err(BridgeError::config(format!(
                        "Invalid value '{}' for {}, expected: 301 or 302",
                        raw, REDIRECT_STATUS
                    )))
                }
            },
            None => preset.redirect_status,
        };
        let error_status_mode = match get(ERROR_STATUS_MODE) {
            Some(raw) => raw.parse::<ErrorStatusMode>().map_err(|_| {
                BridgeError::config(format!(
                    "Invalid value '{}' for {}, expected: uniform or classified",
                    raw, ERROR_STATUS_MODE
                ))
            })?,
            None => ErrorStatusMode::Uniform,
        };
        let handler = HandlerSettings {
            query_param_name: get(ENTRY_QUERY_PARAM)
                .unwrap_or_else(|| preset.query_param_name.to_string()),
            redirect_status,
            error_status_mode,
        };

        let request_timeout = match get(REQUEST_TIMEOUT_MS) {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        };

        Ok(BridgeConfig {
            profile,
            form_provider,
            signing_service,
            mapping,
            handler,
            request_timeout,
        })
    }

    /// Loads settings from a flat JSON object, falling back to the
    /// environment for keys the file does not set.
    ///
    /// String values may be `ENV_NAME` or `${NAME}` placeholders.
    pub fn from_file(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            BridgeError::config(format!(
                "Failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        let settings = load_settings(&content)?;
        Self::from_lookup(|key| settings.get(key).cloned().or_else(|| env::var(key).ok()))
    }
}

/// Parses a flat JSON settings object and resolves its placeholders.
pub fn load_settings(content: &str) -> BridgeResult<HashMap<String, String>> {
    let mut value: Value = serde_json::from_str(content)
        .map_err(|e| BridgeError::config(format!("Invalid configuration format: {}", e)))?;

    VariableResolverProcessor::default().resolve(&mut value)?;

    let object = value
        .as_object()
        .ok_or_else(|| BridgeError::config("Configuration file must contain a JSON object"))?;

    let mut settings = HashMap::new();
    for (key, value) in object {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => continue,
            _ => {
                return Err(BridgeError::config(format!(
                    "Setting '{}' must be a string, number or boolean",
                    key
                )))
            }
        };
        settings.insert(key.clone(), text);
    }
    Ok(settings)
}

fn normalize_base_url(key: &str, raw: &str) -> BridgeResult<String> {
    let url = Url::parse(raw).map_err(|e| {
        BridgeError::config(format!("Invalid URL '{}' for {}: {}", raw, key, e))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(BridgeError::config(format!(
            "Invalid URL '{}' for {}, expected an http or https URL",
            raw, key
        )));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn parse_bool(key: &str, raw: &str) -> BridgeResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(BridgeError::config(format!(
            "Invalid value '{}' for {}, expected: true or false",
            raw, key
        ))),
    }
}

fn parse_timeout(raw: &str) -> BridgeResult<Duration> {
    let millis = raw.parse::<u64>().map_err(|_| {
        BridgeError::config(format!(
            "Invalid value '{}' for {}, expected: milliseconds",
            raw, REQUEST_TIMEOUT_MS
        ))
    })?;
    if millis == 0 || millis > MAX_REQUEST_TIMEOUT_MS {
        return Err(BridgeError::config(format!(
            "{} must be between 1 and {} milliseconds, got {}",
            REQUEST_TIMEOUT_MS, MAX_REQUEST_TIMEOUT_MS, millis
        )));
    }
    Ok(Duration::from_millis(millis))
}

pub trait VariableResolver {
    fn is_resolvable(&self, key: &str) -> bool;
    fn resolve(&self, key: &str) -> BridgeResult<String>;
}

pub struct EnvVarResolver {}

impl VariableResolver for EnvVarResolver {
    fn is_resolvable(&self, key: &str) -> bool {
        // Support both ENV_ prefix and ${VAR} syntax
        key.starts_with("ENV_") || (key.starts_with("${") && key.ends_with('}'))
    }
    fn resolve(&self, key: &str) -> BridgeResult<String> {
        let env_key = if let Some(stripped) = key.strip_prefix("ENV_") {
            stripped
        } else if let Some(inner) = key.strip_prefix("${").and_then(|k| k.strip_suffix('}')) {
            inner
        } else {
            return Err(BridgeError::config(format!(
                "Invalid environment variable format: {}",
                key
            )));
        };

        debug!("Looking up environment variable: {}", env_key);
        env::var(env_key).map_err(|e| {
            BridgeError::config(format!(
                "Failed to find environment variable '{}': {}",
                env_key, e
            ))
        })
    }
}

pub struct VariableResolverProcessor {
    resolvers: Vec<Arc<dyn VariableResolver>>,
}

impl Default for VariableResolverProcessor {
    fn default() -> Self {
        VariableResolverProcessor {
            resolvers: vec![Arc::new(EnvVarResolver {})],
        }
    }
}

impl VariableResolverProcessor {
    pub fn resolve(&self, value: &mut Value) -> BridgeResult<()> {
        match value {
            Value::String(s) => {
                for resolver in &self.resolvers {
                    if resolver.is_resolvable(s) {
                        *s = resolver.resolve(s)?;
                        return Ok(());
                    }
                }
                Ok(())
            }
            Value::Object(map) => {
                for (_, v) in map.iter_mut() {
                    self.resolve(v)?;
                }
                Ok(())
            }
            Value::Array(arr) => {
                for item in arr.iter_mut() {
                    self.resolve(item)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
