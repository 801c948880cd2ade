//! Line, paragraph and text-run helpers shared by the extractors.

/// Split on `\n`, trim every line and drop the ones left empty.
pub fn non_empty_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split on `\n` and keep the segments that contain something besides
/// whitespace. Segments are returned untrimmed.
pub fn non_empty_paragraphs(text: &str) -> Vec<String> {
    text.split('\n')
        .filter(|paragraph| !paragraph.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Join the text runs of one PDF page with single spaces, dropping runs
/// that are blank.
pub fn join_text_runs<S: AsRef<str>>(runs: &[S]) -> String {
    runs.iter()
        .map(|run| run.as_ref().trim())
        .filter(|run| !run.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Join per-page strings with a blank line and trim the result.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(|page| page.as_ref())
        .collect::<Vec<&str>>()
        .join("\n\n")
        .trim()
        .to_string()
}
