//! Local ordering and slicing for the client list

use crate::clients::ClientRecord;

/// Sortable columns of the client table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Contact last name
    Name,
    /// Phone number
    Phone,
    /// Email address
    Email,
    /// City
    City,
    /// Client category
    Type,
}

impl SortKey {
    /// Column identifier used by table heads
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Phone => "phone",
            SortKey::Email => "email",
            SortKey::City => "city",
            SortKey::Type => "type",
        }
    }

    /// Parse a column identifier
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "name" => Some(SortKey::Name),
            "phone" => Some(SortKey::Phone),
            "email" => Some(SortKey::Email),
            "city" => Some(SortKey::City),
            "type" => Some(SortKey::Type),
            _ => None,
        }
    }
}

/// Sort direction of the active column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl SortDirection {
    /// Convert the direction to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// The opposite direction
    pub fn toggled(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Value a record exposes under a sort column; absent fields sort as empty
fn sort_value(record: &ClientRecord, key: SortKey) -> &str {
    match key {
        SortKey::Name => &record.contact_last_name,
        SortKey::Phone => &record.phone_number,
        SortKey::Email => record.email.as_deref().unwrap_or(""),
        SortKey::City => record.city.as_deref().unwrap_or(""),
        SortKey::Type => record.client_type.as_str(),
    }
}

/// Sort records by the chosen column, case-folded and stable with respect
/// to the fetched order
pub fn sort_records(
    records: &[ClientRecord],
    key: SortKey,
    direction: SortDirection,
) -> Vec<ClientRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let left = sort_value(a, key).to_lowercase();
        let right = sort_value(b, key).to_lowercase();
        match direction {
            SortDirection::Asc => left.cmp(&right),
            SortDirection::Desc => right.cmp(&left),
        }
    });
    sorted
}

/// Slice of the sorted records shown on one page
pub fn page_slice(records: &[ClientRecord], page: usize, page_size: usize) -> Vec<ClientRecord> {
    records
        .iter()
        .skip(page.saturating_mul(page_size))
        .take(page_size)
        .cloned()
        .collect()
}

/// Filler rows needed to keep the last page the same height as the others
pub fn empty_rows(page: usize, page_size: usize, total: usize) -> usize {
    if page == 0 {
        0
    } else {
        ((1 + page) * page_size).saturating_sub(total)
    }
}
