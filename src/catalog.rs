//! The static movie catalog the vector index is built from.

use serde::{Deserialize, Serialize};

/// A catalog entry. Immutable for the process lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Stable catalog key.
    pub key: i64,
    pub title: String,
    /// Descriptive text that gets embedded.
    pub description: String,
}

impl Movie {
    pub fn new(key: i64, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// The built-in catalog. Small and static; every refresh re-embeds all of it.
pub fn builtin() -> Vec<Movie> {
    vec![
        Movie::new(
            1,
            "Ogre Movie",
            "A family friendly movie that includes ogres and dragons",
        ),
        Movie::new(
            2,
            "Starship Requiem",
            "A deep space crew races a dying engine core to reach a habitable world before \
             their oxygen runs out",
        ),
        Movie::new(
            3,
            "The Clockwork Detective",
            "A noir mystery where a mechanical investigator untangles a string of impossible \
             thefts in a rain-soaked city",
        ),
        Movie::new(
            4,
            "Summer of the Lighthouse",
            "Two estranged siblings restore their grandfather's lighthouse and rediscover \
             what family means",
        ),
        Movie::new(
            5,
            "Circuit Breakers",
            "Teenage robotics champions take on a corporate team in a national competition \
             with their scrapyard-built machine",
        ),
        Movie::new(
            6,
            "The Last Orchard",
            "A quiet drama about a farming village defending its ancient apple orchard from \
             a railway expansion",
        ),
        Movie::new(
            7,
            "Midnight Heist",
            "A retired safecracker assembles an unlikely crew for one final job inside an \
             art museum vault",
        ),
        Movie::new(
            8,
            "Dragonfall Keep",
            "Knights and a reluctant young mage defend a mountain fortress against a dragon \
             awakened from a thousand-year sleep",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_keys_are_unique() {
        let movies = builtin();
        let keys: HashSet<i64> = movies.iter().map(|m| m.key).collect();
        assert_eq!(keys.len(), movies.len());
    }

    #[test]
    fn builtin_entries_have_descriptions() {
        for movie in builtin() {
            assert!(!movie.title.trim().is_empty());
            assert!(!movie.description.trim().is_empty());
        }
    }

    #[test]
    fn builtin_includes_the_ogre_movie() {
        let movies = builtin();
        let ogre = movies.iter().find(|m| m.key == 1).expect("key 1 present");
        assert_eq!(ogre.title, "Ogre Movie");
    }
}
