/// Declares the environment variables read by `repodex-dev`.
pub(crate) struct EnvVars;

impl EnvVars {
    /// Equivalent to the `--supported-version` command-line argument. The newest
    /// `pypi:repository-version` the parsers accept without complaint, as `<major>.<minor>`.
    pub(crate) const REPODEX_SUPPORTED_REPOSITORY_VERSION: &'static str =
        "REPODEX_SUPPORTED_REPOSITORY_VERSION";

    /// Tracing filter directives, overriding the defaults implied by `--verbose`.
    pub(crate) const RUST_LOG: &'static str = "RUST_LOG";
}
