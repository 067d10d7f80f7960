use std::collections::BTreeMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use maxminddb::{geoip2, Mmap, Reader};

use crate::error::{Error, Result};

/// File name of the optional ASN database looked up next to the city database.
pub const ASN_DB_FILENAME: &str = "GeoLite2-ASN.mmdb";

/// Build metadata reported by the `version` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseInfo {
    pub path: Utf8PathBuf,
    pub database_type: String,
    pub build_epoch: u64,
    pub ip_version: u16,
    pub languages: Vec<String>,
    /// Names of the fields `find` returns, in order.
    pub fields: Vec<String>,
}

impl DatabaseInfo {
    /// An IPv6 tree in MMDB embeds the IPv4 space, so both versions answer IPv4 queries.
    pub fn supports_ipv4(&self) -> bool {
        matches!(self.ip_version, 4 | 6)
    }

    pub fn build_time(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.build_epoch).ok()?;
        DateTime::from_timestamp(secs, 0)
    }
}

/// An opened, read-only IP-to-location database.
pub trait GeoDatabase: fmt::Debug {
    /// Return the descriptive fields for `ip` in the language `locale`.
    ///
    /// Fields with no value are returned as empty strings so the field
    /// positions stay stable.
    fn find(&self, ip: Ipv4Addr, locale: &str) -> Result<Vec<String>>;

    /// Describe the opened database.
    fn info(&self) -> DatabaseInfo;
}

/// MaxMind GeoIP2/GeoLite2 city database, optionally paired with an ASN database.
pub struct MaxMindDatabase {
    path: Utf8PathBuf,
    city_reader: Reader<Mmap>,
    asn_reader: Option<Reader<Mmap>>,
}

impl fmt::Debug for MaxMindDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaxMindDatabase")
            .field("path", &self.path)
            .field("database_type", &self.city_reader.metadata.database_type)
            .field("asn", &self.asn_reader.is_some())
            .finish()
    }
}

impl MaxMindDatabase {
    /// Open the city database at `path`.
    ///
    /// A `GeoLite2-ASN.mmdb` in the same directory is opened too and
    /// supplies the ISP field. Failure to open it only drops that field.
    pub fn open(path: &Utf8Path) -> Result<Self> {
        let city_reader = Reader::open_mmap(path).map_err(|source| Error::DatabaseOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let asn_path = path.with_file_name(ASN_DB_FILENAME);
        let asn_reader = if asn_path.exists() {
            match Reader::open_mmap(&asn_path) {
                Ok(reader) => Some(reader),
                Err(err) => {
                    tracing::debug!(path = %asn_path, error = %err, "skipping ASN database");
                    None
                }
            }
        } else {
            None
        };

        tracing::debug!(
            path = %path,
            database_type = %city_reader.metadata.database_type,
            asn = asn_reader.is_some(),
            "opened database"
        );

        Ok(Self {
            path: path.to_path_buf(),
            city_reader,
            asn_reader,
        })
    }

    fn field_names(&self) -> Vec<String> {
        let mut fields = vec![
            "country_name".to_string(),
            "region_name".to_string(),
            "city_name".to_string(),
        ];
        if self.asn_reader.is_some() {
            fields.push("isp_name".to_string());
        }
        fields
    }
}

/// Pick the `locale` entry of a MaxMind names map.
fn localized(names: Option<BTreeMap<&str, &str>>, locale: &str) -> String {
    names
        .and_then(|names| names.get(locale).copied())
        .unwrap_or_default()
        .to_string()
}

impl GeoDatabase for MaxMindDatabase {
    fn find(&self, ip: Ipv4Addr, locale: &str) -> Result<Vec<String>> {
        let addr = IpAddr::V4(ip);
        let record: geoip2::City = self
            .city_reader
            .lookup(addr)
            .map_err(|source| Error::LookupFailed {
                ip: ip.to_string(),
                source,
            })?;

        let country = localized(record.country.and_then(|c| c.names), locale);
        let region = localized(
            record
                .subdivisions
                .and_then(|subs| subs.into_iter().next())
                .and_then(|s| s.names),
            locale,
        );
        let city = localized(record.city.and_then(|c| c.names), locale);
        let mut fields = vec![country, region, city];

        if let Some(ref asn_reader) = self.asn_reader {
            // organization names are not localized
            let isp = asn_reader
                .lookup::<geoip2::Asn>(addr)
                .ok()
                .and_then(|asn| asn.autonomous_system_organization)
                .unwrap_or_default()
                .to_string();
            fields.push(isp);
        }

        Ok(fields)
    }

    fn info(&self) -> DatabaseInfo {
        let metadata = &self.city_reader.metadata;
        DatabaseInfo {
            path: self.path.clone(),
            database_type: metadata.database_type.clone(),
            build_epoch: metadata.build_epoch,
            ip_version: metadata.ip_version,
            languages: metadata.languages.clone(),
            fields: self.field_names(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(ip_version: u16, build_epoch: u64) -> DatabaseInfo {
        DatabaseInfo {
            path: Utf8PathBuf::from("GeoLite2-City.mmdb"),
            database_type: "GeoLite2-City".to_string(),
            build_epoch,
            ip_version,
            languages: vec!["en".to_string()],
            fields: vec!["country_name".to_string()],
        }
    }

    #[test]
    fn ipv4_support_by_tree_version() {
        assert!(info(4, 0).supports_ipv4());
        assert!(info(6, 0).supports_ipv4());
        assert!(!info(0, 0).supports_ipv4());
    }

    #[test]
    fn build_time_from_epoch() {
        let time = info(6, 1_700_000_000).build_time().unwrap();
        assert_eq!(time.to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn localized_name_lookup() {
        let mut names = BTreeMap::new();
        names.insert("en", "Germany");
        names.insert("de", "Deutschland");
        assert_eq!(localized(Some(names.clone()), "de"), "Deutschland");
        assert_eq!(localized(Some(names), "fr"), "");
        assert_eq!(localized(None, "en"), "");
    }

    #[test]
    fn missing_database_reports_path() {
        let path = Utf8Path::new("/nonexistent/GeoLite2-City.mmdb");
        let err = MaxMindDatabase::open(path).unwrap_err();
        match err {
            Error::DatabaseOpen { path: reported, .. } => assert_eq!(reported.as_path(), path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
