// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Common code for reading source catalogue files.

use std::{fs::File, io::BufReader, path::Path, str::FromStr};

use log::{debug, trace};

use super::{fits, CatalogType, ReadCatalogError, Source, SourceCatalog};

/// Given the path to a source catalogue (and optionally its type), return a
/// validated [`SourceCatalog`]. The [`CatalogType`] is also returned in case
/// that's interesting to the caller.
///
/// If no type is given, the file extension is used. FITS files are expected
/// to be Aegean-style component tables; JSON and YAML files are arrays of
/// `{id, ra, dec, flux, err_flux}` objects.
pub fn read_catalog_file<P: AsRef<Path>>(
    path: P,
    catalog_type: Option<CatalogType>,
) -> Result<(SourceCatalog, CatalogType), ReadCatalogError> {
    fn inner(
        path: &Path,
        catalog_type: Option<CatalogType>,
    ) -> Result<(SourceCatalog, CatalogType), ReadCatalogError> {
        debug!("Attempting to read catalogue {}", path.display());
        if !path.exists() {
            return Err(ReadCatalogError::DoesntExist(path.to_path_buf()));
        }

        let catalog_type = match catalog_type {
            Some(t) => t,
            None => {
                let ext = path
                    .extension()
                    .and_then(|os_str| os_str.to_str())
                    .map(|s| s.to_lowercase());
                match ext.as_deref() {
                    Some("yml") => CatalogType::Yaml,
                    Some("fit") => CatalogType::Fits,
                    Some(e) => CatalogType::from_str(e)
                        .map_err(|_| ReadCatalogError::UnknownType(path.to_path_buf()))?,
                    None => return Err(ReadCatalogError::UnknownType(path.to_path_buf())),
                }
            }
        };
        trace!("Reading catalogue as {catalog_type}");

        let sources = match catalog_type {
            CatalogType::Fits => fits::parse_catalog(path)?,
            CatalogType::Json => {
                let mut f = BufReader::new(File::open(path)?);
                sources_from_json(&mut f)?
            }
            CatalogType::Yaml => {
                let mut f = BufReader::new(File::open(path)?);
                sources_from_yaml(&mut f)?
            }
        };
        debug!("Read {} sources", sources.len());

        Ok((SourceCatalog::new(sources)?, catalog_type))
    }
    inner(path.as_ref(), catalog_type)
}

/// Deserialise sources from JSON.
pub(super) fn sources_from_json<T: std::io::BufRead>(
    buf: &mut T,
) -> Result<Vec<Source>, ReadCatalogError> {
    let sources: Vec<Source> = serde_json::from_reader(buf)?;
    Ok(sources)
}

/// Deserialise sources from YAML.
pub(super) fn sources_from_yaml<T: std::io::BufRead>(
    buf: &mut T,
) -> Result<Vec<Source>, ReadCatalogError> {
    let sources: Vec<Source> = serde_yaml::from_reader(buf)?;
    Ok(sources)
}
