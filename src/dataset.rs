//! Loading of the OpenFlights `airports.dat` and `routes.dat` tables.
//!
//! Both files are headerless CSV. Missing values are written as `\N`, those are read as
//! `None`. Airports without a numeric id can't be placed in the network and are dropped while
//! loading, as are rows the CSV reader can't decode. Other routes are always kept: deciding
//! which of them become edges is left to [`build_graph`](crate::builder::build_graph).

use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// The placeholder OpenFlights uses for missing values.
const MISSING: &str = "\\N";

/// An airport, one row of `airports.dat`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Airport {
    pub id: u32,
    pub name: String,
    pub city: String,
    pub country: String,
    pub iata: Option<String>,
    pub icao: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// In feet.
    pub altitude: Option<f64>,
    /// Hours offset from UTC.
    pub timezone: Option<f64>,
    pub dst: Option<String>,
    /// Olson name, e.g. `America/Sao_Paulo`.
    pub tz_database: Option<String>,
    /// `airport`, `station`, `port` or `unknown`.
    pub kind: Option<String>,
    pub source: Option<String>,
}

/// A route, one row of `routes.dat`.
///
/// The airport ids are kept as parsed: a route whose endpoints don't coerce to an id stays in
/// the dataset and is only dropped when building the graph.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Route {
    pub airline: String,
    pub airline_id: Option<u32>,
    /// IATA or ICAO code of the source airport.
    pub source_code: String,
    pub source_id: Option<u32>,
    pub destination_code: String,
    pub destination_id: Option<u32>,
    pub codeshare: bool,
    pub stops: u32,
    /// Aircraft type codes, space separated in the raw file.
    pub equipment: Vec<String>,
}

/// The raw airport and route tables.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub airports: Vec<Airport>,
    pub routes: Vec<Route>,
}

/// Coerces an airport id written as integral decimal text, `"123"` or `"123.0"`.
///
/// Missing (`\N`), non-numeric, fractional, negative and out of range values yield `None`.
///
/// # Examples
///
/// ```
/// use airnet::dataset::coerce_id;
///
/// assert_eq!(coerce_id("2564"), Some(2564));
/// assert_eq!(coerce_id(" 2564.0 "), Some(2564));
/// assert_eq!(coerce_id("\\N"), None);
/// assert_eq!(coerce_id("12.5"), None);
/// assert_eq!(coerce_id("-1"), None);
/// ```
pub fn coerce_id(raw: &str) -> Option<u32> {
    let raw = raw.trim();

    if let Ok(id) = raw.parse::<u32>() {
        return Some(id);
    }

    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&value) {
        Some(value as u32)
    } else {
        None
    }
}

/// Returns the trimmed field at `i`, `None` if it's absent, empty or `\N`.
fn field(record: &StringRecord, i: usize) -> Option<&str> {
    record
        .get(i)
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != MISSING)
}

fn owned(record: &StringRecord, i: usize) -> Option<String> {
    field(record, i).map(str::to_owned)
}

fn number(record: &StringRecord, i: usize) -> Option<f64> {
    field(record, i).and_then(|value| value.parse().ok())
}

impl Airport {
    /// Parses an `airports.dat` row, `None` if the id is unusable.
    fn from_record(record: &StringRecord) -> Option<Self> {
        Some(Self {
            id: field(record, 0).and_then(coerce_id)?,
            name: owned(record, 1).unwrap_or_default(),
            city: owned(record, 2).unwrap_or_default(),
            country: owned(record, 3).unwrap_or_default(),
            iata: owned(record, 4),
            icao: owned(record, 5),
            latitude: number(record, 6),
            longitude: number(record, 7),
            altitude: number(record, 8),
            timezone: number(record, 9),
            dst: owned(record, 10),
            tz_database: owned(record, 11),
            kind: owned(record, 12),
            source: owned(record, 13),
        })
    }

    /// The IATA code if there is one, the ICAO code otherwise.
    pub fn code(&self) -> Option<&str> {
        self.iata.as_deref().or(self.icao.as_deref())
    }
}

impl Route {
    fn from_record(record: &StringRecord) -> Self {
        Self {
            airline: owned(record, 0).unwrap_or_default(),
            airline_id: field(record, 1).and_then(coerce_id),
            source_code: owned(record, 2).unwrap_or_default(),
            source_id: field(record, 3).and_then(coerce_id),
            destination_code: owned(record, 4).unwrap_or_default(),
            destination_id: field(record, 5).and_then(coerce_id),
            codeshare: field(record, 6) == Some("Y"),
            stops: field(record, 7)
                .and_then(|value| value.parse().ok())
                .unwrap_or(0),
            equipment: field(record, 8)
                .map(|value| value.split_whitespace().map(str::to_owned).collect())
                .unwrap_or_default(),
        }
    }

    /// Both endpoint ids, if both coerced.
    pub fn endpoints(&self) -> Option<(u32, u32)> {
        Some((self.source_id?, self.destination_id?))
    }
}

fn records<R: Read>(reader: R) -> csv::StringRecordsIntoIter<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
        .into_records()
}

/// Yields the decodable records of `reader`, counting the others in `unreadable`.
///
/// A row that fails to decode (invalid UTF-8, for instance) is skipped and the reader moves
/// on to the next one. I/O failures of the underlying stream still abort the load.
fn readable<'a, R: Read + 'a>(
    reader: R,
    unreadable: &'a mut usize,
) -> impl Iterator<Item = Result<StringRecord>> + 'a {
    records(reader).filter_map(move |record| match record {
        Ok(record) => Some(Ok(record)),
        Err(err) if err.is_io_error() => Some(Err(err.into())),
        Err(err) => {
            *unreadable += 1;
            debug!(%err, "dropping unreadable row");
            None
        }
    })
}

impl Dataset {
    /// Reads both tables from any CSV source.
    ///
    /// # Examples
    ///
    /// ```
    /// use airnet::dataset::Dataset;
    ///
    /// let airports = "\
    /// 2564,\"Guarulhos\",\"Sao Paulo\",\"Brazil\",\"GRU\",\"SBGR\",-23.43,-46.47,2459,-3,\"S\",\"America/Sao_Paulo\",\"airport\",\"OurAirports\"
    /// 2531,\"Galeao\",\"Rio De Janeiro\",\"Brazil\",\"GIG\",\"SBGL\",-22.81,-43.25,28,-3,\"S\",\"America/Sao_Paulo\",\"airport\",\"OurAirports\"
    /// ";
    /// let routes = "G3,3547,GRU,2564,GIG,2531,,0,738\n";
    ///
    /// let dataset = Dataset::from_readers(airports.as_bytes(), routes.as_bytes()).unwrap();
    ///
    /// assert_eq!(dataset.airports.len(), 2);
    /// assert_eq!(dataset.airports[0].iata.as_deref(), Some("GRU"));
    /// assert_eq!(dataset.routes[0].endpoints(), Some((2564, 2531)));
    /// ```
    pub fn from_readers<A: Read, R: Read>(airports: A, routes: R) -> Result<Self> {
        let mut dataset = Self::default();
        let (mut dropped, mut unreadable) = (0, 0);

        for record in readable(airports, &mut unreadable) {
            let record = record?;
            match Airport::from_record(&record) {
                Some(airport) => dataset.airports.push(airport),
                None => {
                    dropped += 1;
                    let line = record.position().map(|position| position.line());
                    debug!(?line, "dropping malformed airport");
                }
            }
        }

        for record in readable(routes, &mut unreadable) {
            dataset.routes.push(Route::from_record(&record?));
        }

        info!(
            airports = dataset.airports.len(),
            routes = dataset.routes.len(),
            dropped_airports = dropped,
            unreadable_rows = unreadable,
            "loaded dataset"
        );

        Ok(dataset)
    }

    /// Reads both tables from files, typically `airports.dat` and `routes.dat`.
    pub fn load(airports: impl AsRef<Path>, routes: impl AsRef<Path>) -> Result<Self> {
        let open = |path: &Path| File::open(path).map_err(|err| Error::io(err, path));

        Self::from_readers(open(airports.as_ref())?, open(routes.as_ref())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AIRPORTS: &str = r#"2564,"Guarulhos","Sao Paulo","Brazil","GRU","SBGR",-23.43,-46.47,2459,-3,"S","America/Sao_Paulo","airport","OurAirports"
3,"Mount Hagen","Mount Hagen","Papua New Guinea","HGU","AYMH",-5.82,144.29,5388,10,"U","Pacific/Port_Moresby","airport","OurAirports"
\N,"Nowhere","Nowhere","Brazil",\N,\N,0,0,0,0,"U",\N,"airport","OurAirports"
7,"No Coordinates","Somewhere","Brazil",\N,"SBXX",\N,-46,0,-3,"S",\N,"airport","OurAirports"
"#;

    #[test]
    fn coerce_id_forms() {
        assert_eq!(coerce_id("123"), Some(123));
        assert_eq!(coerce_id("123.0"), Some(123));
        assert_eq!(coerce_id("\\N"), None);
        assert_eq!(coerce_id(""), None);
        assert_eq!(coerce_id("abc"), None);
        assert_eq!(coerce_id("1e3"), Some(1000));
        assert_eq!(coerce_id("NaN"), None);
        assert_eq!(coerce_id("4294967296"), None);
    }

    #[test]
    fn airports_without_id_are_dropped() {
        let dataset = Dataset::from_readers(AIRPORTS.as_bytes(), "".as_bytes()).unwrap();
        let ids: Vec<u32> = dataset.airports.iter().map(|a| a.id).collect();

        assert_eq!(ids, vec![2564, 3, 7]);
    }

    #[test]
    fn missing_coordinates_are_kept() {
        let dataset = Dataset::from_readers(AIRPORTS.as_bytes(), "".as_bytes()).unwrap();
        let airport = &dataset.airports[2];

        assert_eq!(airport.name, "No Coordinates");
        assert_eq!(airport.latitude, None);
        assert_eq!(airport.longitude, Some(-46.0));
    }

    #[test]
    fn undecodable_rows_are_skipped() {
        let routes: &[u8] = b"XX,10,AAA,1,BBB,2,,0,320\nX\xff,1,AAA,1,BBB,\\N,,0,320\nYY,11,BBB,2,AAA,1,,0,738\n";
        let airports: &[u8] = b"1,\"A\xff\",\"A\",\"Brazil\",\"AAA\",\\N,0,0,0,-3,\"S\",\\N,\"airport\",\"OurAirports\"\n";

        let dataset = Dataset::from_readers(airports, routes).unwrap();

        assert!(dataset.airports.is_empty());
        let endpoints: Vec<_> = dataset.routes.iter().map(Route::endpoints).collect();
        assert_eq!(endpoints, vec![Some((1, 2)), Some((2, 1))]);
    }

    #[test]
    fn airport_fields() {
        let dataset = Dataset::from_readers(AIRPORTS.as_bytes(), "".as_bytes()).unwrap();
        let gru = &dataset.airports[0];

        assert_eq!(gru.name, "Guarulhos");
        assert_eq!(gru.country, "Brazil");
        assert_eq!(gru.code(), Some("GRU"));
        assert_eq!(gru.latitude, Some(-23.43));
        assert_eq!(gru.altitude, Some(2459.0));
        assert_eq!(gru.timezone, Some(-3.0));
        assert_eq!(gru.tz_database.as_deref(), Some("America/Sao_Paulo"));
        assert_eq!(gru.kind.as_deref(), Some("airport"));
    }

    #[test]
    fn route_fields() {
        let routes = "2B,410,AER,2965,KZN,2990,Y,0,CR2 A320\nZZ,\\N,GRU,2564,XXX,\\N,,0,\n";
        let dataset = Dataset::from_readers("".as_bytes(), routes.as_bytes()).unwrap();

        let first = &dataset.routes[0];
        assert_eq!(first.airline_id, Some(410));
        assert_eq!(first.endpoints(), Some((2965, 2990)));
        assert!(first.codeshare);
        assert_eq!(first.equipment, vec!["CR2", "A320"]);

        let second = &dataset.routes[1];
        assert_eq!(second.airline_id, None);
        assert_eq!(second.destination_id, None);
        assert_eq!(second.endpoints(), None);
        assert!(!second.codeshare);
        assert!(second.equipment.is_empty());
    }

    #[test]
    fn short_rows_are_tolerated() {
        let dataset = Dataset::from_readers("".as_bytes(), "XX,1,AAA\n".as_bytes()).unwrap();

        assert_eq!(dataset.routes.len(), 1);
        assert_eq!(dataset.routes[0].source_id, None);
    }

    #[test]
    fn missing_file() {
        let err = Dataset::load("does/not/exist/airports.dat", "routes.dat").unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
    }
}
