//! YAML frontmatter parsing for markdown resource files

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;

/// Split a markdown document into parsed YAML frontmatter and body.
///
/// The document must start with a `---` line; the frontmatter runs until the
/// next `---` line. Everything after that is the body.
pub fn parse<T: DeserializeOwned>(content: &str) -> Result<(T, &str)> {
    let rest = content
        .strip_prefix("---")
        .ok_or_else(|| anyhow!("missing frontmatter delimiter"))?;
    let rest = rest.strip_prefix('\r').unwrap_or(rest);
    let rest = rest
        .strip_prefix('\n')
        .ok_or_else(|| anyhow!("missing frontmatter delimiter"))?;

    let end = rest
        .find("\n---")
        .ok_or_else(|| anyhow!("unterminated frontmatter"))?;
    let header = &rest[..end];

    // Skip the closing delimiter line; the body starts on the next line.
    let after_delim = &rest[end + 1..];
    let body = match after_delim.find('\n') {
        Some(i) => &after_delim[i + 1..],
        None => "",
    };

    let parsed = serde_yaml::from_str(header)
        .map_err(|e| anyhow!("invalid frontmatter: {}", e))?;
    Ok((parsed, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Meta {
        name: String,
        #[serde(default)]
        description: String,
    }

    #[test]
    fn parses_frontmatter_and_body() {
        let doc = "---\nname: review\ndescription: Review code\n---\n\n# Review\n";
        let (meta, body) = parse::<Meta>(doc).unwrap();
        assert_eq!(meta.name, "review");
        assert_eq!(meta.description, "Review code");
        assert!(body.contains("# Review"));
    }

    #[test]
    fn missing_description_defaults_empty() {
        let doc = "---\nname: bare\n---\nbody";
        let (meta, _) = parse::<Meta>(doc).unwrap();
        assert_eq!(meta.description, "");
    }

    #[test]
    fn rejects_document_without_frontmatter() {
        assert!(parse::<Meta>("# Just markdown\n").is_err());
    }

    #[test]
    fn rejects_unterminated_frontmatter() {
        assert!(parse::<Meta>("---\nname: x\n").is_err());
    }
}
