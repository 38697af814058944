//! Option schemas known to the host package manager.
//!
//! The resolver only checks assignments against an [`OptionCatalog`]; where the
//! schemas come from is up to the host. [`BuiltinCatalog`] ships the schemas of
//! `ffmpeg/6.1`, its `libx265` codec dependency, and the `compiler` settings
//! scope used for runtime linkage.

use crate::option::OptionValue;
use crate::ConfigError;
use std::collections::BTreeMap;

/// Settings scope that carries compiler-level values such as `runtime`.
pub const COMPILER_SCOPE: &str = "compiler";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionKind {
    Bool,
    /// String restricted to a fixed set of values.
    Choice(Vec<String>),
    /// Free-form string.
    Text,
}

impl OptionKind {
    pub fn choice(values: &[&str]) -> Self {
        OptionKind::Choice(values.iter().map(|v| (*v).to_owned()).collect())
    }

    pub fn accepts(&self, value: &OptionValue) -> bool {
        match (self, value) {
            (OptionKind::Bool, OptionValue::Bool(_)) | (OptionKind::Text, OptionValue::Str(_)) => {
                true
            }
            (OptionKind::Choice(values), OptionValue::Str(s)) => values.iter().any(|v| v == s),
            _ => false,
        }
    }

    fn describe(&self) -> String {
        match self {
            OptionKind::Bool => "a boolean".to_owned(),
            OptionKind::Choice(values) => format!("one of [{}]", values.join(", ")),
            OptionKind::Text => "a string".to_owned(),
        }
    }
}

/// The options one dependency recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySchema {
    pub name: String,
    pub options: BTreeMap<String, OptionKind>,
}

impl DependencySchema {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            options: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn option(mut self, key: &str, kind: OptionKind) -> Self {
        self.options.insert(key.to_owned(), kind);
        self
    }

    #[must_use]
    pub fn bools(mut self, keys: &[&str]) -> Self {
        for key in keys {
            self.options.insert((*key).to_owned(), OptionKind::Bool);
        }
        self
    }

    pub fn validate(&self, key: &str, value: &OptionValue) -> Result<(), ConfigError> {
        let kind = self
            .options
            .get(key)
            .ok_or_else(|| ConfigError::UnknownOption {
                dependency: self.name.clone(),
                key: key.to_owned(),
            })?;
        if !kind.accepts(value) {
            return Err(ConfigError::InvalidValue {
                dependency: self.name.clone(),
                key: key.to_owned(),
                value: value.to_string(),
                expected: kind.describe(),
            });
        }
        Ok(())
    }
}

pub trait OptionCatalog: Send + Sync {
    fn schema(&self, dependency: &str) -> Option<&DependencySchema>;

    fn dependencies(&self) -> Vec<&str>;

    fn validate(&self, dependency: &str, key: &str, value: &OptionValue) -> Result<(), ConfigError> {
        self.schema(dependency)
            .ok_or_else(|| ConfigError::UnknownDependency(dependency.to_owned()))?
            .validate(key, value)
    }
}

#[derive(Debug, Clone)]
pub struct BuiltinCatalog {
    schemas: BTreeMap<String, DependencySchema>,
}

impl BuiltinCatalog {
    pub fn new() -> Self {
        let mut catalog = Self {
            schemas: BTreeMap::new(),
        };
        catalog.insert(ffmpeg_schema());
        catalog.insert(libx265_schema());
        catalog.insert(compiler_schema());
        catalog
    }

    /// An empty catalog, for hosts that supply every schema themselves.
    pub fn empty() -> Self {
        Self {
            schemas: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: DependencySchema) -> Self {
        self.insert(schema);
        self
    }

    fn insert(&mut self, schema: DependencySchema) {
        self.schemas.insert(schema.name.clone(), schema);
    }
}

impl Default for BuiltinCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionCatalog for BuiltinCatalog {
    fn schema(&self, dependency: &str) -> Option<&DependencySchema> {
        self.schemas.get(dependency)
    }

    fn dependencies(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }
}

fn ffmpeg_schema() -> DependencySchema {
    DependencySchema::new("ffmpeg").bools(&[
        "shared",
        "fPIC",
        "avdevice",
        "avcodec",
        "avformat",
        "swresample",
        "swscale",
        "postproc",
        "avfilter",
        "with_asm",
        "with_zlib",
        "with_bzip2",
        "with_lzma",
        "with_libiconv",
        "with_freetype",
        "with_openjpeg",
        "with_openh264",
        "with_opus",
        "with_vorbis",
        "with_zeromq",
        "with_sdl",
        "with_libx264",
        "with_libx265",
        "with_libvpx",
        "with_libmp3lame",
        "with_libfdk_aac",
        "with_libwebp",
        "with_libalsa",
        "with_pulse",
        "with_vaapi",
        "with_vdpau",
        "with_vulkan",
        "with_xcb",
        "with_xlib",
        "with_appkit",
        "with_avfoundation",
        "with_coreimage",
        "with_audiotoolbox",
        "with_videotoolbox",
        "with_programs",
        "disable_everything",
        "disable_all_encoders",
        "disable_all_decoders",
        "disable_all_hardware_accelerators",
        "disable_all_muxers",
        "disable_all_demuxers",
        "disable_all_parsers",
        "disable_all_bitstream_filters",
        "disable_all_protocols",
        "disable_all_devices",
        "disable_all_input_devices",
        "disable_all_output_devices",
        "disable_all_filters",
    ])
}

fn libx265_schema() -> DependencySchema {
    DependencySchema::new("libx265")
        .bools(&["shared", "fPIC", "assembly", "HDR10", "SVG_HEVC_encoder", "with_numa"])
        .option("bit_depth", OptionKind::choice(&["8", "10", "12"]))
}

fn compiler_schema() -> DependencySchema {
    DependencySchema::new(COMPILER_SCOPE)
        .option(
            "runtime",
            OptionKind::choice(&["MT", "MTd", "MD", "MDd", "static", "dynamic"]),
        )
        .option("runtime_type", OptionKind::choice(&["Debug", "Release"]))
        .option("cppstd", OptionKind::Text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_knows_ffmpeg_libx265_and_compiler() {
        let catalog = BuiltinCatalog::new();
        assert_eq!(catalog.dependencies(), vec!["compiler", "ffmpeg", "libx265"]);
        assert!(catalog.schema("ffmpeg").unwrap().options.contains_key("fPIC"));
    }

    #[test]
    fn validate_accepts_known_bool() {
        let catalog = BuiltinCatalog::new();
        assert!(catalog
            .validate("ffmpeg", "with_vulkan", &OptionValue::Bool(false))
            .is_ok());
    }

    #[test]
    fn validate_rejects_unknown_key() {
        let catalog = BuiltinCatalog::new();
        let err = catalog
            .validate("ffmpeg", "with_vulcan", &OptionValue::Bool(false))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownOption { key, .. } if key == "with_vulcan"));
    }

    #[test]
    fn validate_rejects_unknown_dependency() {
        let catalog = BuiltinCatalog::new();
        let err = catalog
            .validate("gstreamer", "shared", &OptionValue::Bool(true))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDependency(d) if d == "gstreamer"));
    }

    #[test]
    fn validate_rejects_wrong_type() {
        let catalog = BuiltinCatalog::new();
        assert!(catalog
            .validate("ffmpeg", "fPIC", &OptionValue::from("True"))
            .is_err());
        assert!(catalog
            .validate("compiler", "runtime", &OptionValue::Bool(true))
            .is_err());
    }

    #[test]
    fn choice_restricts_values() {
        let catalog = BuiltinCatalog::new();
        assert!(catalog
            .validate("compiler", "runtime", &OptionValue::from("MT"))
            .is_ok());
        let err = catalog
            .validate("compiler", "runtime", &OptionValue::from("MX"))
            .unwrap_err();
        assert!(err.to_string().contains("one of [MT, MTd, MD, MDd, static, dynamic]"));
        assert!(catalog
            .validate("libx265", "bit_depth", &OptionValue::from("10"))
            .is_ok());
    }

    #[test]
    fn host_supplied_schema() {
        let catalog = BuiltinCatalog::empty()
            .with_schema(DependencySchema::new("openh264").bools(&["shared"]));
        assert!(catalog
            .validate("openh264", "shared", &OptionValue::Bool(true))
            .is_ok());
        assert!(catalog.schema("ffmpeg").is_none());
    }
}
