/// Lowercases a header cell and strips everything but ASCII alphanumerics,
/// so "GL Acct #" and "gl_acct_num" both normalize to comparable forms.
pub fn normalize_header(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Finds the index of the first alias present in an already-normalized
/// header row. Aliases are normalized the same way, and tried in order.
pub fn find_header_index(headers: &[String], aliases: &[&str]) -> Option<usize> {
    for alias in aliases {
        let normalized = normalize_header(alias);
        if let Some(idx) = headers.iter().position(|h| *h == normalized) {
            return Some(idx);
        }
    }
    None
}

/// Column positions for a donation import, resolved from the header row.
pub struct DonationColumns {
    pub date: Option<usize>,
    pub category: Option<usize>,
    pub gl_acct: Option<usize>,
    pub quantity: Option<usize>,
    pub pounds: Option<usize>,
    pub anonymous: Option<usize>,
    pub org_name: Option<usize>,
    pub first_name: Option<usize>,
    pub last_name: Option<usize>,
    pub address: Option<usize>,
    pub city: Option<usize>,
    pub state: Option<usize>,
    pub zip: Option<usize>,
    pub email: Option<usize>,
    pub description: Option<usize>,
    pub total: Option<usize>,
}

impl DonationColumns {
    pub fn resolve(headers: &[String]) -> Self {
        DonationColumns {
            date: find_header_index(headers, &["date"]),
            category: find_header_index(headers, &["category"]),
            gl_acct: find_header_index(headers, &["glacct", "glacct#", "glacctnum", "glacctnumber"]),
            quantity: find_header_index(headers, &["qty", "quantity"]),
            pounds: find_header_index(headers, &["pounds"]),
            anonymous: find_header_index(headers, &["anonymousyfores", "anonymous"]),
            org_name: find_header_index(headers, &["orgname", "organization", "organizationname"]),
            first_name: find_header_index(headers, &["firstname", "first"]),
            last_name: find_header_index(headers, &["lastname", "last"]),
            address: find_header_index(headers, &["address"]),
            city: find_header_index(headers, &["city"]),
            state: find_header_index(headers, &["state"]),
            zip: find_header_index(headers, &["zip"]),
            email: find_header_index(headers, &["email"]),
            description: find_header_index(headers, &["description"]),
            total: find_header_index(headers, &["totalfairmarket", "totalfairmarketvalue", "total"]),
        }
    }

    /// A donation file must name a date column and either a GL account
    /// column or a category column.
    pub fn check_required(&self) -> Result<(), String> {
        if self.date.is_none() || (self.gl_acct.is_none() && self.category.is_none()) {
            return Err("CSV must include Date and either GL Acct# or Category columns.".to_string());
        }
        Ok(())
    }
}

/// Column positions for an individual import.
pub struct IndividualColumns {
    pub first_name: Option<usize>,
    pub last_name: Option<usize>,
    pub address: Option<usize>,
    pub city: Option<usize>,
    pub state: Option<usize>,
    pub zip: Option<usize>,
    pub email: Option<usize>,
}

impl IndividualColumns {
    pub fn resolve(headers: &[String]) -> Self {
        IndividualColumns {
            first_name: find_header_index(headers, &["individualfirstname", "firstname"]),
            last_name: find_header_index(headers, &["individuallastname", "lastname"]),
            address: find_header_index(headers, &["address"]),
            city: find_header_index(headers, &["city"]),
            state: find_header_index(headers, &["state"]),
            zip: find_header_index(headers, &["zip"]),
            email: find_header_index(headers, &["email"]),
        }
    }

    pub fn check_required(&self) -> Result<(), String> {
        if self.first_name.is_none() || self.last_name.is_none() {
            return Err(
                "CSV must include headers for individual_first_name and individual_last_name."
                    .to_string(),
            );
        }
        Ok(())
    }
}
