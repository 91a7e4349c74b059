use std::fmt;
use std::str::FromStr;

/// Zero-based child indices from the root groups down to one node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<usize>);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathParseError {
    #[error("path is empty")]
    Empty,
    #[error("invalid path component {component:?} at position {position}")]
    InvalidComponent { component: String, position: usize },
}

impl Path {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

/// Parses the comma-separated form used by the layout view, e.g. `"0,2,1"`.
impl FromStr for Path {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(PathParseError::Empty);
        }
        s.split(',')
            .enumerate()
            .map(|(position, part)| {
                let part = part.trim();
                part.parse::<usize>()
                    .map_err(|_| PathParseError::InvalidComponent {
                        component: part.to_string(),
                        position,
                    })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Path)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, idx) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{idx}")?;
        }
        Ok(())
    }
}
