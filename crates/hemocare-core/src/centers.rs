//! Treatment-center vocabulary: the predefined states of the network and
//! the centers operating in each, plus the fixed complaint list.

use serde::{Deserialize, Serialize};

/// Center name accepted for every state when the actual center is not in
/// the predefined list.
pub const OTHER_CENTER: &str = "Other";

/// Presenting complaints offered by the visit form. Anything outside the
/// list is recorded as "Other" plus free text.
pub const COMPLAINT_OPTIONS: &[&str] = &[
    "Joint hemarthrosis",
    "Intracranial hemorrhage",
    "Iliopsoas hematoma",
    "Hematemesis",
    "Melena",
    "Gum bleeding",
    "Tooth extraction",
    "Tongue bleeding",
    "Epistaxis",
    "Hematuria",
    "Crush injury/RTA",
    "Hemorrhagic cyst",
    "Menorrhagia",
    "Subconjunctival bleeding",
    "Orbital hematoma",
    "Preoperative preparation/intervention",
    "Labour",
    "Circumcision",
    "Other",
];

/// A state of the treatment network. Serialized as its display name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, uniffi::Enum)]
pub enum CenterState {
    Khartoum,
    #[serde(rename = "Al Jazirah")]
    AlJazirah,
    #[serde(rename = "White Nile")]
    WhiteNile,
    #[serde(rename = "Blue Nile")]
    BlueNile,
    Northern,
    #[serde(rename = "River Nile")]
    RiverNile,
    #[serde(rename = "Red Sea")]
    RedSea,
    Kassala,
    #[serde(rename = "Al Qadarif")]
    AlQadarif,
    Sennar,
    #[serde(rename = "North Kordofan")]
    NorthKordofan,
    #[serde(rename = "South Kordofan")]
    SouthKordofan,
    #[serde(rename = "West Kordofan")]
    WestKordofan,
    #[serde(rename = "Central Darfur")]
    CentralDarfur,
    #[serde(rename = "North Darfur")]
    NorthDarfur,
    #[serde(rename = "South Darfur")]
    SouthDarfur,
    #[serde(rename = "East Darfur")]
    EastDarfur,
    #[serde(rename = "West Darfur")]
    WestDarfur,
}

impl CenterState {
    /// Every state, in the order the selector presents them.
    pub const ALL: [CenterState; 18] = [
        Self::Khartoum,
        Self::AlJazirah,
        Self::WhiteNile,
        Self::BlueNile,
        Self::Northern,
        Self::RiverNile,
        Self::RedSea,
        Self::Kassala,
        Self::AlQadarif,
        Self::Sennar,
        Self::NorthKordofan,
        Self::SouthKordofan,
        Self::WestKordofan,
        Self::CentralDarfur,
        Self::NorthDarfur,
        Self::SouthDarfur,
        Self::EastDarfur,
        Self::WestDarfur,
    ];

    /// Display name, identical to the wire value.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Khartoum => "Khartoum",
            Self::AlJazirah => "Al Jazirah",
            Self::WhiteNile => "White Nile",
            Self::BlueNile => "Blue Nile",
            Self::Northern => "Northern",
            Self::RiverNile => "River Nile",
            Self::RedSea => "Red Sea",
            Self::Kassala => "Kassala",
            Self::AlQadarif => "Al Qadarif",
            Self::Sennar => "Sennar",
            Self::NorthKordofan => "North Kordofan",
            Self::SouthKordofan => "South Kordofan",
            Self::WestKordofan => "West Kordofan",
            Self::CentralDarfur => "Central Darfur",
            Self::NorthDarfur => "North Darfur",
            Self::SouthDarfur => "South Darfur",
            Self::EastDarfur => "East Darfur",
            Self::WestDarfur => "West Darfur",
        }
    }

    /// Parse a display name, `None` for anything unknown.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|state| state.name() == value)
    }

    /// Treatment centers operating in this state.
    pub fn centers(&self) -> &'static [&'static str] {
        match self {
            Self::Khartoum => &[
                "Khartoum Teaching Hospital",
                "Omdurman Hospital",
                "Bahri Hospital",
                "Ibn Sina Hospital",
                "Royal Care Hospital",
            ],
            Self::AlJazirah => &["Wad Madani Teaching Hospital", "Al Managil Hospital"],
            Self::WhiteNile => &["Rabak Hospital", "Kosti Hospital"],
            Self::BlueNile => &["Ad-Damazin Hospital"],
            Self::Northern => &["Dongola Hospital", "Merowe Hospital"],
            Self::RiverNile => &["Atbara Teaching Hospital", "Shendi Hospital"],
            Self::RedSea => &["Port Sudan Teaching Hospital"],
            Self::Kassala => &["Kassala Teaching Hospital"],
            Self::AlQadarif => &["Al Qadarif Hospital"],
            Self::Sennar => &["Sennar Hospital"],
            Self::NorthKordofan => &["El Obeid Teaching Hospital"],
            Self::SouthKordofan => &["Kadugli Hospital"],
            Self::WestKordofan => &["El Fula Hospital"],
            Self::CentralDarfur => &["Zalingei Hospital"],
            Self::NorthDarfur => &["El Fasher Hospital"],
            Self::SouthDarfur => &["Nyala Teaching Hospital"],
            Self::EastDarfur => &["Ed Daein Hospital"],
            Self::WestDarfur => &["El Geneina Hospital"],
        }
    }

    /// Whether `center` is a valid center name for this state.
    pub fn allows_center(&self, center: &str) -> bool {
        center == OTHER_CENTER || self.centers().contains(&center)
    }
}

impl std::fmt::Display for CenterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
