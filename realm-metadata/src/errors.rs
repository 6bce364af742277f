// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{error, fmt};

/// An error that occurs while reading or writing a [`StatsDocument`](crate::StatsDocument).
#[derive(Debug)]
pub enum StatsFormatError {
    /// The input was not a valid stats document.
    Deserialize(serde_yaml::Error),

    /// The document could not be serialized.
    Serialize(serde_yaml::Error),
}

impl fmt::Display for StatsFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Deserialize(_) => write!(f, "parsing stats document failed"),
            Self::Serialize(_) => write!(f, "serializing stats document failed"),
        }
    }
}

impl error::Error for StatsFormatError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Deserialize(err) | Self::Serialize(err) => Some(err),
        }
    }
}
