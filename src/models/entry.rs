use serde::Serialize;

/// A to-do item as stored in the `entries` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

/// Wire shape of an entry. `url` points at the single-item resource.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct EntryRepresentation {
    pub title: String,
    pub completed: bool,
    pub url: String,
}

impl EntryRepresentation {
    pub fn new(entry: Entry, url: String) -> Self {
        Self {
            title: entry.title,
            completed: entry.completed,
            url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_fields_in_wire_order() {
        let entry = Entry {
            id: 1,
            title: "a".to_string(),
            completed: false,
        };
        let body = EntryRepresentation::new(entry, "http://localhost/entries/1".to_string());

        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"title":"a","completed":false,"url":"http://localhost/entries/1"}"#
        );
    }
}
