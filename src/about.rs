pub const ANNONEX_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const ANNONEX_BUILD_N: &str = env!("ANNONEX_BUILD_N");

pub fn version_cli_text() -> String {
    format!(
        "annonex {}\nBuild {}\nAnnotated alignments to submission-ready flat files",
        ANNONEX_VERSION, ANNONEX_BUILD_N
    )
}
