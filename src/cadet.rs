use serde::{Deserialize, Serialize};

pub type CadetId = String;

/// Ids travel comma-joined in CSV cells, so they must be non-empty, free of
/// commas and carry no surrounding whitespace.
pub(crate) fn is_valid_cadet_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(',') && id.trim() == id
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "O",
        }
    }

    /// The two categories a day must both cover to count as gender balanced.
    pub const BALANCED_PAIR: [Gender; 2] = [Gender::Male, Gender::Female];
}

/// A roster entry as consumed by the schedule builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cadet {
    pub id: CadetId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub eligible: bool,
    #[serde(default)]
    pub certified: bool,
    #[serde(default)]
    pub chief: bool,
}

/// Display and ordering tier of a cadet within a day's assignment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CadetRole {
    Chief,
    Certified,
    Regular,
}

impl CadetRole {
    pub fn label(&self) -> &'static str {
        match self {
            CadetRole::Chief => "Chief",
            CadetRole::Certified => "Certified",
            CadetRole::Regular => "Regular",
        }
    }
}

impl Cadet {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            gender: None,
            eligible: true,
            certified: false,
            chief: false,
        }
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn certified(mut self) -> Self {
        self.certified = true;
        self
    }

    pub fn chief(mut self) -> Self {
        self.chief = true;
        self
    }

    pub fn ineligible(mut self) -> Self {
        self.eligible = false;
        self
    }

    pub fn role(&self) -> CadetRole {
        if self.chief {
            CadetRole::Chief
        } else if self.certified {
            CadetRole::Certified
        } else {
            CadetRole::Regular
        }
    }
}

/// Eligible cadets split into the groups the greedy passes walk over.
///
/// The groups overlap: `non_chiefs` contains every member of
/// `certified_non_chiefs`. Order follows the roster order handed in, so a
/// shuffled roster yields shuffled groups.
#[derive(Debug, Clone, Default)]
pub struct RosterPartition<'a> {
    pub chiefs: Vec<&'a Cadet>,
    pub certified_non_chiefs: Vec<&'a Cadet>,
    pub non_chiefs: Vec<&'a Cadet>,
}

impl<'a> RosterPartition<'a> {
    pub fn from_roster<I>(roster: I) -> Self
    where
        I: IntoIterator<Item = &'a Cadet>,
    {
        let mut partition = Self::default();
        for cadet in roster.into_iter().filter(|c| c.eligible) {
            if cadet.chief {
                partition.chiefs.push(cadet);
                continue;
            }
            if cadet.certified {
                partition.certified_non_chiefs.push(cadet);
            }
            partition.non_chiefs.push(cadet);
        }
        partition
    }

    pub fn eligible_count(&self) -> usize {
        self.chiefs.len() + self.non_chiefs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_skips_ineligible_and_keeps_chiefs_apart() {
        let roster = vec![
            Cadet::new("k", "Kai").chief().certified(),
            Cadet::new("c", "Cam").certified(),
            Cadet::new("p", "Pat"),
            Cadet::new("x", "Xen").certified().ineligible(),
        ];
        let partition = RosterPartition::from_roster(&roster);
        let ids = |group: &[&Cadet]| group.iter().map(|c| c.id.clone()).collect::<Vec<_>>();

        assert_eq!(ids(&partition.chiefs), vec!["k"]);
        assert_eq!(ids(&partition.certified_non_chiefs), vec!["c"]);
        assert_eq!(ids(&partition.non_chiefs), vec!["c", "p"]);
        assert_eq!(partition.eligible_count(), 3);
    }

    #[test]
    fn cadet_ids_must_survive_csv_cells() {
        assert!(is_valid_cadet_id("c-17"));
        assert!(!is_valid_cadet_id(""));
        assert!(!is_valid_cadet_id("a,b"));
        assert!(!is_valid_cadet_id(" padded"));
    }

    #[test]
    fn roles_sort_chief_first() {
        let mut roles = vec![CadetRole::Regular, CadetRole::Chief, CadetRole::Certified];
        roles.sort();
        assert_eq!(
            roles,
            vec![CadetRole::Chief, CadetRole::Certified, CadetRole::Regular]
        );
        assert_eq!(Cadet::new("k", "Kai").chief().certified().role(), CadetRole::Chief);
    }

    #[test]
    fn gender_uses_single_letter_codes() {
        let cadet = Cadet::new("f", "Fern").with_gender(Gender::Female);
        let json = serde_json::to_string(&cadet).unwrap();
        assert!(json.contains(r#""gender":"F""#));
        let back: Cadet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cadet);
    }
}
