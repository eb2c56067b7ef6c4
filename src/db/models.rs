use chrono::{DateTime, NaiveDate, Utc};
use postgres::Row;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Donation {
    pub donation_id: i32,
    pub date_received: NaiveDate,
    pub gl_acct: String,
    pub quantity: f64,
    pub amount: f64,
    pub total_fair_market_value: f64,
    pub description: Option<String>,
    pub ministry_code: Option<String>,
    pub organization_code: Option<String>,
    pub individual_id: Option<i32>,
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Donation {
    // Column order must match DONATION_COLUMNS in the query module.
    pub fn from_row(row: &Row) -> Self {
        let quantity: f64 = row.get(3);
        let amount: f64 = row.get(4);
        Donation {
            donation_id: row.get(0),
            date_received: row.get(1),
            gl_acct: row.get(2),
            quantity,
            amount,
            total_fair_market_value: quantity * amount,
            description: row.get(5),
            ministry_code: row.get(6),
            organization_code: row.get(7),
            individual_id: row.get(8),
            user_id: row.get(9),
            created_at: row.get(10),
            updated_at: row.get(11),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Individual {
    pub individual_id: i32,
    pub individual_first_name: String,
    pub individual_last_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Individual {
    pub fn from_row(row: &Row) -> Self {
        Individual {
            individual_id: row.get(0),
            individual_first_name: row.get(1),
            individual_last_name: row.get(2),
            address: row.get(3),
            city: row.get(4),
            state: row.get(5),
            zip: row.get(6),
            email: row.get(7),
            created_at: row.get(8),
            updated_at: row.get(9),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Organization {
    pub organization_code: String,
    pub organization_name: String,
    pub contact_first_name: Option<String>,
    pub contact_last_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub contact_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    pub fn from_row(row: &Row) -> Self {
        Organization {
            organization_code: row.get(0),
            organization_name: row.get(1),
            contact_first_name: row.get(2),
            contact_last_name: row.get(3),
            address: row.get(4),
            city: row.get(5),
            state: row.get(6),
            zip: row.get(7),
            contact_email: row.get(8),
            created_at: row.get(9),
            updated_at: row.get(10),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Ministry {
    pub ministry_code: String,
    pub ministry_name: String,
    pub has_scale: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ministry {
    pub fn from_row(row: &Row) -> Self {
        Ministry {
            ministry_code: row.get(0),
            ministry_name: row.get(1),
            has_scale: row.get(2),
            created_at: row.get(3),
            updated_at: row.get(4),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WishListItem {
    pub wishlist_id: i32,
    pub item_name: String,
    pub ministry_code: String,
    pub ministry_name: Option<String>,
    #[serde(rename = "type")]
    pub item_type: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WishListItem {
    pub fn from_row(row: &Row) -> Self {
        WishListItem {
            wishlist_id: row.get(0),
            item_name: row.get(1),
            ministry_code: row.get(2),
            ministry_name: row.get(3),
            item_type: row.get(4),
            description: row.get(5),
            status: row.get(6),
            created_at: row.get(7),
            updated_at: row.get(8),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppUser {
    pub user_id: i32,
    pub username: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl AppUser {
    pub fn from_row(row: &Row) -> Self {
        AppUser {
            user_id: row.get(0),
            username: row.get(1),
            display_name: row.get(2),
            email: row.get(3),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewDonation {
    pub date_received: NaiveDate,
    pub gl_acct: String,
    pub quantity: f64,
    pub amount: f64,
    pub description: Option<String>,
    pub ministry_code: Option<String>,
    pub organization_code: Option<String>,
    pub individual_id: Option<i32>,
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewIndividual {
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub code: String,
    pub name: String,
    pub contact_first_name: Option<String>,
    pub contact_last_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewMinistry {
    pub code: String,
    pub name: String,
    pub has_scale: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewWishListItem {
    pub item_name: String,
    pub ministry_code: String,
    pub item_type: String,
    pub description: Option<String>,
    pub status: String,
}

/// PATCH payloads: the outer `Option` is "field present in the request",
/// the inner `Option` (where there is one) is the value itself, so an
/// explicit null clears a nullable column.
#[derive(Debug, Default, Clone)]
pub struct DonationUpdate {
    pub date_received: Option<NaiveDate>,
    pub gl_acct: Option<String>,
    pub quantity: Option<f64>,
    pub amount: Option<f64>,
    pub description: Option<Option<String>>,
    pub ministry_code: Option<Option<String>>,
    pub organization_code: Option<Option<String>>,
    pub individual_id: Option<Option<i32>>,
}

impl DonationUpdate {
    pub fn is_empty(&self) -> bool {
        self.date_received.is_none()
            && self.gl_acct.is_none()
            && self.quantity.is_none()
            && self.amount.is_none()
            && self.description.is_none()
            && self.ministry_code.is_none()
            && self.organization_code.is_none()
            && self.individual_id.is_none()
    }
}

#[derive(Debug, Default, Clone)]
pub struct IndividualUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub state: Option<Option<String>>,
    pub zip: Option<Option<String>>,
    pub email: Option<Option<String>>,
}

impl IndividualUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.zip.is_none()
            && self.email.is_none()
    }
}

#[derive(Debug, Default, Clone)]
pub struct OrganizationUpdate {
    pub name: Option<String>,
    pub contact_first_name: Option<Option<String>>,
    pub contact_last_name: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub state: Option<Option<String>>,
    pub zip: Option<Option<String>>,
    pub contact_email: Option<Option<String>>,
}

impl OrganizationUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.contact_first_name.is_none()
            && self.contact_last_name.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.zip.is_none()
            && self.contact_email.is_none()
    }
}

#[derive(Debug, Default, Clone)]
pub struct MinistryUpdate {
    pub name: Option<String>,
    pub has_scale: Option<bool>,
}

impl MinistryUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.has_scale.is_none()
    }
}

#[derive(Debug, Default, Clone)]
pub struct WishListUpdate {
    pub item_name: Option<String>,
    pub ministry_code: Option<String>,
    pub item_type: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<String>,
}

impl WishListUpdate {
    pub fn is_empty(&self) -> bool {
        self.item_name.is_none()
            && self.ministry_code.is_none()
            && self.item_type.is_none()
            && self.description.is_none()
            && self.status.is_none()
    }
}
