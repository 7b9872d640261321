use anyhow::{anyhow, Result};

use crate::model::topic::Topic;

/// Finds the topic a user meant: an exact id, an exact title, or a unique
/// title prefix (case-insensitive).
pub fn resolve_topic<'a>(query: &str, topics: &'a [Topic]) -> Result<&'a Topic> {
    let query = query.trim();
    if query.is_empty() {
        return Err(anyhow!("Empty topic name"));
    }

    // 1. Exact match
    if let Some(topic) = topics.iter().find(|t| t.id == query) {
        return Ok(topic);
    }
    let needle = query.to_lowercase();
    if let Some(topic) = topics.iter().find(|t| t.title.to_lowercase() == needle) {
        return Ok(topic);
    }

    // 2. Prefix match
    let matches: Vec<&Topic> = topics
        .iter()
        .filter(|t| t.title.to_lowercase().starts_with(&needle))
        .collect();

    match matches.len() {
        1 => Ok(matches[0]),
        0 => Err(anyhow!("Unknown topic: '{}'", query)),
        _ => {
            let titles: Vec<&str> = matches.iter().map(|t| t.title.as_str()).collect();
            Err(anyhow!("Ambiguous topic: '{}' matches {:?}", query, titles))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topics() -> Vec<Topic> {
        vec![
            Topic::new("t1", "Algebra"),
            Topic::new("t2", "Analysis"),
            Topic::new("t3", "Geometry"),
            Topic::new("t4", "Geometry 2"),
        ]
    }

    #[test]
    fn test_resolve_topic() {
        let topics = topics();

        assert_eq!(resolve_topic("t2", &topics).unwrap().title, "Analysis");
        assert_eq!(resolve_topic("alg", &topics).unwrap().id, "t1");
        assert_eq!(resolve_topic("ANALYSIS", &topics).unwrap().id, "t2");
        // exact title wins over the longer prefix match
        assert_eq!(resolve_topic("geometry", &topics).unwrap().id, "t3");

        // Ambiguous
        assert!(resolve_topic("a", &topics).is_err());
        assert!(resolve_topic("geo", &topics).is_err());

        // Unknown
        assert!(resolve_topic("x", &topics).is_err());
        assert!(resolve_topic("  ", &topics).is_err());
    }
}
