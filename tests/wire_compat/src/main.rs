fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use gamehub_file_ops::{FileEntry, download_url, format_size};
    use gamehub_registry::GameRegistry;

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    fn read_fixture(name: &str) -> String {
        let path = fixtures_dir().join(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        serde_json::from_str(&read_fixture(name))
            .unwrap_or_else(|e| panic!("failed to parse fixture {name}: {e}"))
    }

    /// Top-level keys of a JSON object in document order.
    fn top_level_keys(json: &str) -> Vec<String> {
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        let mut keys: Vec<(usize, String)> = value
            .as_object()
            .unwrap()
            .keys()
            .map(|k| (json.find(&format!("\"{k}\"")).unwrap(), k.clone()))
            .collect();
        keys.sort();
        keys.into_iter().map(|(_, k)| k).collect()
    }

    #[test]
    fn games_payload_matches_fixture() {
        let reserialized = serde_json::to_value(GameRegistry::builtin()).unwrap();
        assert_eq!(load_fixture("games.json"), reserialized);
    }

    #[test]
    fn games_payload_keeps_key_order() {
        let serialized = serde_json::to_string(&GameRegistry::builtin()).unwrap();
        assert_eq!(
            top_level_keys(&read_fixture("games.json")),
            top_level_keys(&serialized)
        );
    }

    #[test]
    fn file_entry_matches_fixture() {
        let fixture = load_fixture("file_entry.json");
        let entry: FileEntry = serde_json::from_value(fixture.clone()).unwrap();

        assert_eq!(entry.size_human, format_size(entry.size));
        assert_eq!(entry.url, download_url("ddnet", &entry.name));
        assert_eq!(serde_json::to_value(&entry).unwrap(), fixture);
    }
}
