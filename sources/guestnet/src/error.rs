//! Provides the list of errors for `guestnet`.

use crate::os_id::OsId;
use snafu::Snafu;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Unrecognized box '{}': no known OS pattern matches", box_name))]
    UnrecognizedBox { box_name: String },

    #[snafu(display("No network template registered for OS '{}'", os))]
    UnknownOsTag { os: OsId },

    #[snafu(display("Template references '{}', which was not supplied", name))]
    MissingParameter { name: String },

    #[snafu(display(
        "Unable to format '{}' as '{}': got '{}'",
        name,
        conversion,
        value
    ))]
    Format {
        name: String,
        conversion: char,
        value: String,
    },

    #[snafu(display("Failed to read network spec from '{}': {}", path.display(), source))]
    NetworkSpecRead { path: PathBuf, source: io::Error },

    #[snafu(display("Failed to parse network spec '{}': {}", path.display(), source))]
    NetworkSpecParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
