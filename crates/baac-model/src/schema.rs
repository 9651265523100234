//! Column names of the BAAC open-data files.
//!
//! Names are case-sensitive and match the published CSV headers.

/// Accident identifier shared by every table after normalization.
pub const NUM_ACC: &str = "Num_Acc";

/// Accident identifier as named in the 2022 characteristics file.
pub const ACCIDENT_ID: &str = "Accident_Id";

/// Vehicle identifier, key between persons and vehicles.
pub const ID_VEHICULE: &str = "id_vehicule";

/// Person identifier.
pub const ID_USAGER: &str = "id_usager";

/// Birth year of the person.
pub const AN_NAIS: &str = "an_nais";

/// Derived age.
pub const AGE: &str = "age";

/// Pedestrian action, mixed letter and numeric codes.
pub const ACTP: &str = "actp";

/// Number of traffic lanes.
pub const NBV: &str = "nbv";

/// Infrastructure type.
pub const INFRA: &str = "infra";

/// Initial point of impact.
pub const CHOC: &str = "choc";

/// Reserved lane.
pub const VOSP: &str = "vosp";

/// Safety equipment slots.
pub const SECU1: &str = "secu1";
pub const SECU2: &str = "secu2";
pub const SECU3: &str = "secu3";

/// Derived count of safety equipment used.
pub const SECU: &str = "secu";

/// Fixed obstacle hit.
pub const OBS: &str = "obs";

/// Mobile obstacle hit.
pub const OBSM: &str = "obsm";

/// Derived combined obstacle code.
pub const OBSCAR: &str = "obscar";

/// Injury severity, the modeling label.
pub const LABEL: &str = "grav";

/// Literal written by the data producer when the lane count could not be computed.
pub const NBV_ERROR_MARKER: &str = "#ERREUR";

/// Columns where `0` is a real category and is shifted to `1`.
pub const REBASED_COLUMNS: [&str; 4] = [INFRA, CHOC, VOSP, NBV];

/// Dataset vintage loaded when none is configured.
pub const DEFAULT_VINTAGE: u16 = 2022;

/// Year used to turn a birth year into an age when none is configured.
pub const DEFAULT_REFERENCE_YEAR: i64 = 2022;

/// Final feature set handed to modeling, label included.
pub const FEATURES: [&str; 27] = [
    "place", "catu", "grav", "sexe", "trajet", "senc", "catv", "obscar", "choc", "manv", "motor",
    "catr", "circ", "vosp", "prof", "plan", "surf", "infra", "situ", "vma", "lum", "agg", "int",
    "atm", "col", "age", "secu",
];

/// Owned copy of [`FEATURES`], for options structs.
pub fn default_features() -> Vec<String> {
    FEATURES.iter().map(ToString::to_string).collect()
}
