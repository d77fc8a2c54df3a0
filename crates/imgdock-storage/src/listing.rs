//! Listing and query layer
//!
//! Turns raw gateway listings into display entries and applies the
//! search / folder / sort / pagination pipeline used by the object browser.

use crate::traits::{ObjectStorage, StoredObject};
use crate::BucketKind;
use imgdock_core::models::ListedObject;
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use utoipa::ToSchema;

pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Column the listing is sorted by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    #[serde(alias = "s3Object")]
    Key,
    #[serde(alias = "cloudfrontUrl")]
    Url,
    Size,
    #[default]
    LastModified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    /// Case-insensitive substring matched against the key
    pub search: Option<String>,
    /// Key prefix, usually one of the values returned by [`folders`]
    pub folder: Option<String>,
    pub sort: SortColumn,
    pub order: SortOrder,
    /// 1-based page number; 0 is treated as 1
    pub page: usize,
    pub per_page: usize,
}

impl Default for ListingQuery {
    fn default() -> Self {
        ListingQuery {
            search: None,
            folder: None,
            sort: SortColumn::default(),
            order: SortOrder::default(),
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    pub objects: Vec<ListedObject>,
    /// Number of objects matching the filters, across all pages
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}

/// Build display entries: public URL, size in KiB with two decimals and a
/// `DD. MM. YYYY HH:MM` timestamp.
pub fn to_entries(
    storage: &dyn ObjectStorage,
    bucket: BucketKind,
    objects: Vec<StoredObject>,
) -> Vec<ListedObject> {
    objects
        .into_iter()
        .map(|obj| ListedObject {
            url: storage.public_url(bucket, &obj.key),
            size_in_kb: format!("{:.2}", obj.size_bytes as f64 / 1024.0),
            last_modified: obj.last_modified.format("%d. %m. %Y %H:%M").to_string(),
            key: obj.key,
            size_bytes: obj.size_bytes,
            last_modified_at: Some(obj.last_modified),
        })
        .collect()
}

fn compare(a: &ListedObject, b: &ListedObject, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Key => a.key.cmp(&b.key),
        SortColumn::Url => a.url.cmp(&b.url),
        SortColumn::Size => a.size_bytes.cmp(&b.size_bytes),
        SortColumn::LastModified => a.last_modified_at.cmp(&b.last_modified_at),
    }
}

/// Filter, sort and paginate a listing
pub fn apply(objects: Vec<ListedObject>, query: &ListingQuery) -> ListingPage {
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);
    let folder = query
        .folder
        .as_deref()
        .map(|f| f.trim().trim_end_matches('/'))
        .filter(|f| !f.is_empty())
        .map(|f| format!("{}/", f));

    let mut matching: Vec<ListedObject> = objects
        .into_iter()
        .filter(|obj| {
            folder
                .as_deref()
                .map_or(true, |f| obj.key.starts_with(f))
        })
        .filter(|obj| {
            search
                .as_deref()
                .map_or(true, |s| obj.key.to_lowercase().contains(s))
        })
        .collect();

    // sort_by is stable, ties keep listing order in both directions
    match query.order {
        SortOrder::Asc => matching.sort_by(|a, b| compare(a, b, query.sort)),
        SortOrder::Desc => matching.sort_by(|a, b| compare(b, a, query.sort)),
    }

    let per_page = query.per_page.max(1);
    let page = query.page.max(1);
    let total = matching.len();
    let total_pages = total.div_ceil(per_page);

    let objects = matching
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    ListingPage {
        objects,
        total,
        page,
        total_pages,
    }
}

/// Distinct parent directories of keys under the bucket prefix, in
/// first-seen order (e.g. `assets/images` for `assets/images/a.png`).
pub fn folders(objects: &[ListedObject], bucket: BucketKind) -> Vec<String> {
    let prefix = bucket.prefix();
    let mut seen = HashSet::new();

    objects
        .iter()
        .filter(|obj| obj.key.starts_with(prefix))
        .filter_map(|obj| obj.key.rfind('/').map(|idx| &obj.key[..idx]))
        .filter(|folder| !folder.is_empty())
        .filter(|folder| seen.insert(folder.to_string()))
        .map(String::from)
        .collect()
}
