//! Pull the rewrite out of model output and optionally write it back.

use colored::Colorize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Quote pairs a model likes to wrap a bare answer in
const QUOTE_PAIRS: &[(char, char)] = &[('"', '"'), ('\u{201c}', '\u{201d}'), ('\'', '\'')];

/// First fenced block's body, if there is a closed one
fn fenced_block(output: &str) -> Option<&str> {
    let open = output.find("```")?;
    let after = open + 3;
    // Skip an info string such as ```text
    let body_start = after + output[after..].find('\n').map(|j| j + 1)?;
    let close = output[body_start..].find("```")?;
    Some(&output[body_start..body_start + close])
}

/// The rewritten post: the first fenced block, else the whole output minus wrapping quotes
pub fn extract_rewrite(output: &str) -> String {
    if let Some(block) = fenced_block(output) {
        return block.trim().to_string();
    }
    let trimmed = output.trim();
    for (open, close) in QUOTE_PAIRS {
        if let Some(inner) = trimmed
            .strip_prefix(*open)
            .and_then(|s| s.strip_suffix(*close))
        {
            return inner.trim().to_string();
        }
    }
    trimmed.to_string()
}

/// Offer to replace the draft with the rewrite. Returns true if written.
pub fn offer_apply(path: &Path, current: &str, rewritten: &str) -> io::Result<bool> {
    if current.trim() == rewritten.trim() {
        return Ok(false);
    }

    println!(
        "\n{} ({} chars) -> rewrite ({} chars)",
        "Current draft".dimmed(),
        current.chars().count(),
        rewritten.chars().count()
    );
    print!("Replace {} with the rewrite? [y/N] ", path.display());
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let answer = line.trim().to_lowercase();

    if answer == "y" || answer == "yes" {
        let mut content = rewritten.trim_end().to_string();
        content.push('\n');
        fs::write(path, content)?;
        println!("{}", "Applied.".green());
        Ok(true)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_fenced_with_preamble() {
        let output = "Here's a version:\n```\nshipped the thing. finally\n```\nHope it helps";
        assert_eq!(extract_rewrite(output), "shipped the thing. finally");
    }

    #[test]
    fn test_extract_fence_with_info_string() {
        assert_eq!(extract_rewrite("```text\n  ok  \n```"), "ok");
    }

    #[test]
    fn test_extract_first_block_wins() {
        let output = "```\nfirst\n```\n```\nsecond\n```";
        assert_eq!(extract_rewrite(output), "first");
    }

    #[test]
    fn test_extract_unclosed_fence_falls_back_to_text() {
        assert_eq!(extract_rewrite("```\nno end"), "```\nno end");
    }

    #[test]
    fn test_extract_strips_wrapping_quotes() {
        assert_eq!(extract_rewrite("  \"honestly it works\"\n"), "honestly it works");
        assert_eq!(extract_rewrite("\u{201c}curly\u{201d}"), "curly");
    }

    #[test]
    fn test_extract_keeps_inner_quotes() {
        assert_eq!(
            extract_rewrite("she said \"no\" and left"),
            "she said \"no\" and left"
        );
    }

    #[test]
    fn test_offer_apply_same_content_returns_false() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("post.txt");
        std::fs::write(&path, "same").unwrap();

        assert!(!offer_apply(&path, "same\n", "same").unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "same");
    }
}
