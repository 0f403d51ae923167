use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RequestError, TileMapError};

/// A user-supplied ground. Components stay unchecked integers until the
/// validator has seen them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomGround {
    pub name: String,
    pub rgb: Vec<i64>,
}

impl CustomGround {
    pub fn new(name: impl Into<String>, rgb: &[i64]) -> Self {
        CustomGround {
            name: name.into(),
            rgb: rgb.to_vec(),
        }
    }
}

/// Everything needed to construct a map, exactly as the user gave it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MapRequest {
    pub width: i64,
    pub height: i64,
    #[serde(default)]
    pub grounds: Vec<String>,
    #[serde(default)]
    pub custom_grounds: Vec<CustomGround>,
    #[serde(default)]
    pub min_seeds: Option<i64>,
    #[serde(default)]
    pub max_seeds: Option<i64>,
}

impl MapRequest {
    pub fn new(width: i64, height: i64) -> Self {
        MapRequest {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_grounds<I, S>(mut self, grounds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grounds = grounds.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_custom(mut self, name: impl Into<String>, rgb: &[i64]) -> Self {
        self.add_custom(CustomGround::new(name, rgb));
        self
    }

    pub fn with_min_seeds(mut self, min_seeds: i64) -> Self {
        self.min_seeds = Some(min_seeds);
        self
    }

    pub fn with_max_seeds(mut self, max_seeds: i64) -> Self {
        self.max_seeds = Some(max_seeds);
        self
    }

    /// Adds a custom ground, replacing the colour of an existing ground with
    /// the same name in place.
    pub fn add_custom(&mut self, ground: CustomGround) {
        match self
            .custom_grounds
            .iter_mut()
            .find(|existing| existing.name == ground.name)
        {
            Some(existing) => existing.rgb = ground.rgb,
            None => self.custom_grounds.push(ground),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, RequestError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RequestError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| RequestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

/// Parses an RGB tuple written as `(r, g, b)`. Brackets are required, the
/// number of components is not checked here.
pub fn parse_rgb(text: &str) -> Result<Vec<i64>, TileMapError> {
    let cleaned: String = text.chars().filter(|c| *c != '\'').collect();
    let inner = cleaned
        .trim()
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| TileMapError::invalid(format!("wrong given RGB tuple: '{}'", text.trim())))?;

    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(',')
        .map(|part| {
            part.trim().parse::<i64>().map_err(|_| {
                TileMapError::invalid(format!("wrong given RGB tuple: '{}'", text.trim()))
            })
        })
        .collect()
}

/// Parses a `name=(r, g, b)` pair as given on the command line.
pub fn parse_custom_ground(text: &str) -> Result<CustomGround, TileMapError> {
    let (name, rgb) = text
        .split_once('=')
        .ok_or_else(|| TileMapError::invalid(format!("expected NAME=(R,G,B), got '{text}'")))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(TileMapError::invalid("custom ground needs a name"));
    }
    Ok(CustomGround::new(name, &parse_rgb(rgb)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgb() {
        assert_eq!(parse_rgb("(0, 0, 0)").unwrap(), vec![0, 0, 0]);
        assert_eq!(parse_rgb("'(-1,0,300)'").unwrap(), vec![-1, 0, 300]);
        assert_eq!(parse_rgb("(1, 2)").unwrap(), vec![1, 2]);
        assert!(parse_rgb("0, 0, 0").is_err());
        assert!(parse_rgb("(a, b, c)").is_err());
        assert!(parse_rgb("").is_err());
    }

    #[test]
    fn test_parse_custom_ground() {
        let ground = parse_custom_ground("black=(0,0,0)").unwrap();
        assert_eq!(ground, CustomGround::new("black", &[0, 0, 0]));
        assert!(parse_custom_ground("(0,0,0)").is_err());
        assert!(parse_custom_ground("=(0,0,0)").is_err());
    }

    #[test]
    fn test_add_custom_replaces_same_name() {
        let request = MapRequest::new(10, 10)
            .with_custom("black", &[0, 0, 0])
            .with_custom("red", &[255, 0, 0])
            .with_custom("black", &[10, 10, 10]);
        assert_eq!(request.custom_grounds.len(), 2);
        assert_eq!(request.custom_grounds[0].rgb, vec![10, 10, 10]);
    }

    #[test]
    fn test_from_json() {
        let request = MapRequest::from_json_str(
            r#"{
                "width": 20,
                "height": 30,
                "grounds": ["water", "sand"],
                "custom_grounds": [{ "name": "black", "rgb": [0, 0, 0] }],
                "max_seeds": 12
            }"#,
        )
        .unwrap();
        assert_eq!(request.width, 20);
        assert_eq!(request.grounds, vec!["water", "sand"]);
        assert_eq!(request.custom_grounds[0].name, "black");
        assert_eq!(request.min_seeds, None);
        assert_eq!(request.max_seeds, Some(12));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            MapRequest::from_json_str("{ width: }"),
            Err(RequestError::Parse(_))
        ));
    }
}
