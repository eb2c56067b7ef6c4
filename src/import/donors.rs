use std::collections::{HashMap, HashSet};

use crate::db::models::{NewIndividual, NewOrganization};
use crate::import::fields;
use crate::import::headers::DonationColumns;
use crate::import::store::{ImportStore, StoreError};

const MAX_CODE_ATTEMPTS: u32 = 5;

/// The identifying fields a donation row may carry for its donor, already
/// trimmed and normalized the way resolution expects them.
#[derive(Debug, Clone)]
pub struct DonorIdentity {
    pub org_name: String,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub email: Option<String>,
}

impl DonorIdentity {
    pub fn from_row(cols: &DonationColumns, values: &[String]) -> Self {
        let get = |idx: Option<usize>| -> &str {
            idx.and_then(|i| values.get(i)).map(String::as_str).unwrap_or("")
        };
        let non_empty = |v: &str| -> Option<String> {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };

        DonorIdentity {
            org_name: get(cols.org_name).trim().to_string(),
            first_name: get(cols.first_name).trim().to_string(),
            last_name: get(cols.last_name).trim().to_string(),
            address: non_empty(get(cols.address)),
            city: non_empty(get(cols.city)),
            state: non_empty(&get(cols.state).trim().to_uppercase()),
            zip: fields::normalize_optional_zip(get(cols.zip)),
            email: fields::normalize_optional_email(get(cols.email)),
        }
    }
}

#[derive(Debug, Default)]
pub struct ResolvedDonor {
    pub organization_code: Option<String>,
    pub individual_id: Option<i32>,
}

/// Per-batch lookup state. Loaded once at the start of an import and kept
/// current as the batch creates organizations and individuals, so later rows
/// in the same file resolve without re-querying the store.
pub struct DonorCache {
    organizations_by_name: HashMap<String, String>,
    organization_codes: HashSet<String>,
    individuals_by_email: HashMap<String, i32>,
    individuals_by_key: HashMap<String, i32>,
}

impl DonorCache {
    pub fn load<S: ImportStore>(store: &mut S) -> Result<Self, StoreError> {
        let mut organizations_by_name = HashMap::new();
        let mut organization_codes = HashSet::new();
        for org in store.organizations()? {
            organizations_by_name.insert(org.name.trim().to_lowercase(), org.code.clone());
            organization_codes.insert(org.code);
        }

        let mut individuals_by_email = HashMap::new();
        let mut individuals_by_key = HashMap::new();
        for ind in store.individuals()? {
            if let Some(email) = ind.email.as_deref() {
                let email = email.trim().to_lowercase();
                if !email.is_empty() {
                    individuals_by_email.insert(email, ind.id);
                }
            }
            let key = composite_key(
                &ind.first_name,
                &ind.last_name,
                ind.address.as_deref(),
                ind.city.as_deref(),
                ind.state.as_deref(),
                ind.zip.as_deref(),
            );
            if key_is_meaningful(&key) {
                individuals_by_key.insert(key, ind.id);
            }
        }

        Ok(DonorCache {
            organizations_by_name,
            organization_codes,
            individuals_by_email,
            individuals_by_key,
        })
    }

    /// Matches a row's identity to an existing organization or individual,
    /// creating one when nothing matches. Organization name wins over
    /// individual fields; rows with neither resolve to nothing.
    pub fn resolve<S: ImportStore>(
        &mut self,
        store: &mut S,
        identity: &DonorIdentity,
    ) -> Result<ResolvedDonor, String> {
        if !identity.org_name.is_empty() {
            let name_key = identity.org_name.to_lowercase();
            let code = match self.organizations_by_name.get(&name_key) {
                Some(code) => code.clone(),
                None => self.create_organization(store, identity, &name_key)?,
            };
            return Ok(ResolvedDonor {
                organization_code: Some(code),
                individual_id: None,
            });
        }

        if identity.first_name.is_empty()
            && identity.last_name.is_empty()
            && identity.email.is_none()
        {
            return Ok(ResolvedDonor::default());
        }

        if let Some(email) = identity.email.as_deref() {
            if let Some(id) = self.individuals_by_email.get(email) {
                return Ok(ResolvedDonor {
                    organization_code: None,
                    individual_id: Some(*id),
                });
            }
        }

        let key = composite_key(
            &identity.first_name,
            &identity.last_name,
            identity.address.as_deref(),
            identity.city.as_deref(),
            identity.state.as_deref(),
            identity.zip.as_deref(),
        );
        if key_is_meaningful(&key) {
            if let Some(id) = self.individuals_by_key.get(&key) {
                return Ok(ResolvedDonor {
                    organization_code: None,
                    individual_id: Some(*id),
                });
            }
        }

        let new_individual = NewIndividual {
            first_name: or_unknown(&identity.first_name),
            last_name: or_unknown(&identity.last_name),
            address: identity.address.clone(),
            city: identity.city.clone(),
            state: identity.state.clone(),
            zip: identity.zip.clone(),
            email: identity.email.clone(),
        };
        let id = store
            .insert_individual(&new_individual)
            .map_err(|e| e.to_string())?;

        if let Some(email) = identity.email.as_deref() {
            self.individuals_by_email.insert(email.to_string(), id);
        }
        if key_is_meaningful(&key) {
            self.individuals_by_key.insert(key, id);
        }

        Ok(ResolvedDonor {
            organization_code: None,
            individual_id: Some(id),
        })
    }

    /// Inserts a new organization under a freshly derived code. A unique
    /// violation means another writer took the code first; the attempted
    /// code joins the used set and a suffixed one is tried, bounded at
    /// `MAX_CODE_ATTEMPTS`.
    fn create_organization<S: ImportStore>(
        &mut self,
        store: &mut S,
        identity: &DonorIdentity,
        name_key: &str,
    ) -> Result<String, String> {
        let mut code = fields::make_organization_code(&identity.org_name, &self.organization_codes);
        let mut attempts = 0;
        loop {
            let org = NewOrganization {
                code: code.clone(),
                name: identity.org_name.clone(),
                contact_first_name: none_if_empty(&identity.first_name),
                contact_last_name: none_if_empty(&identity.last_name),
                address: identity.address.clone(),
                city: identity.city.clone(),
                state: identity.state.clone(),
                zip: identity.zip.clone(),
                contact_email: identity.email.clone(),
            };
            match store.insert_organization(&org) {
                Ok(created) => {
                    self.organizations_by_name
                        .insert(name_key.to_string(), created.clone());
                    self.organization_codes.insert(created.clone());
                    return Ok(created);
                }
                Err(StoreError::Conflict(_)) => {
                    self.organization_codes.insert(code);
                    attempts += 1;
                    if attempts >= MAX_CODE_ATTEMPTS {
                        return Err(format!(
                            "could not allocate a unique code for organization \"{}\".",
                            identity.org_name
                        ));
                    }
                    code =
                        fields::make_organization_code(&identity.org_name, &self.organization_codes);
                }
                Err(err) => return Err(err.to_string()),
            }
        }
    }
}

fn or_unknown(value: &str) -> String {
    if value.is_empty() {
        "Unknown".to_string()
    } else {
        value.to_string()
    }
}

fn none_if_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn composite_key(
    first: &str,
    last: &str,
    address: Option<&str>,
    city: Option<&str>,
    state: Option<&str>,
    zip: Option<&str>,
) -> String {
    [
        first,
        last,
        address.unwrap_or(""),
        city.unwrap_or(""),
        state.unwrap_or(""),
        zip.unwrap_or(""),
    ]
    .map(|part| part.trim().to_lowercase())
    .join("|")
}

// A key of nothing but separators identifies nobody.
fn key_is_meaningful(key: &str) -> bool {
    key.chars().any(|c| c != '|')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_key_lowercases_and_joins() {
        let key = composite_key("Pat", "Doe", Some("1 Main St"), Some("Duluth"), Some("MN"), None);
        assert_eq!(key, "pat|doe|1 main st|duluth|mn|");
        assert!(key_is_meaningful(&key));
    }

    #[test]
    fn empty_key_is_not_meaningful() {
        let key = composite_key("", "", None, None, None, None);
        assert_eq!(key, "|||||");
        assert!(!key_is_meaningful(&key));
    }
}
