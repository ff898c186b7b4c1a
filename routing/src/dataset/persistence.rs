use crate::dataset::Dataset;
use common::util::logging::run_with_spinner;
use std::fmt;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[derive(thiserror::Error, Debug)]
pub enum PersistenceError {
    Io(#[from] std::io::Error),
    Json(#[from] serde_json::Error),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let err: &dyn Display = match self {
            PersistenceError::Io(err) => err,
            PersistenceError::Json(err) => err,
        };
        write!(f, "{}", err)
    }
}

impl Dataset {
    pub fn save_to_writer<W: Write>(&self, writer: W) -> PersistenceResult<()> {
        let mut writer = BufWriter::new(writer);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load_from_reader<R: Read>(reader: R) -> PersistenceResult<Self> {
        Ok(serde_json::from_reader(BufReader::new(reader))?)
    }

    pub fn save_to_disk(&self, path: &Path) -> PersistenceResult<()> {
        run_with_spinner("persistence", "Saving dataset", || {
            let file = File::create(path)?;
            self.save_to_writer(file)
        })
    }

    pub fn load_from_disk(path: &Path) -> PersistenceResult<Self> {
        run_with_spinner("persistence", "Loading dataset", || {
            let file = File::open(path)?;
            Self::load_from_reader(file)
        })
    }
}

/// (De)serializes a sparse `date -> bool` map as `{"__type__": "Map", "entries": [[k, v], ...]}`,
/// so integer keys survive the trip through JSON objects.
pub(crate) mod tagged_map {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    const MAP_TYPE: &str = "Map";

    #[derive(Serialize)]
    struct TaggedMapRef<'a> {
        #[serde(rename = "__type__")]
        kind: &'static str,
        entries: Vec<(&'a u32, &'a bool)>,
    }

    #[derive(Deserialize)]
    struct TaggedMap {
        #[serde(rename = "__type__")]
        kind: String,
        entries: Vec<(u32, bool)>,
    }

    pub fn serialize<S: Serializer>(map: &BTreeMap<u32, bool>, serializer: S) -> Result<S::Ok, S::Error> {
        TaggedMapRef { kind: MAP_TYPE, entries: map.iter().collect() }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeMap<u32, bool>, D::Error> {
        let tagged = TaggedMap::deserialize(deserializer)?;
        if tagged.kind != MAP_TYPE {
            return Err(D::Error::custom(format!("expected a tagged {MAP_TYPE}, got {}", tagged.kind)));
        }
        Ok(tagged.entries.into_iter().collect())
    }
}
