//! OPDS catalog feeds
//!
//! Built-in schemas for Atom/OPDS 1.2 feeds, entries and OpenSearch
//! descriptions, plus typed views over the mapped values.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use roxmltree::Node;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::mapper::{text_content, Mapper};
use super::namespaces::Namespaces;
use super::schema::{AttrSchema, NsSpec, Schema, Transform};
use super::MapError;

/// OPDS link relations
pub mod rel {
    pub const SELF: &str = "self";
    pub const START: &str = "start";
    pub const UP: &str = "up";
    pub const NEXT: &str = "next";
    pub const PREVIOUS: &str = "previous";
    pub const SEARCH: &str = "search";
    pub const SUBSECTION: &str = "subsection";
    pub const ACQUISITION: &str = "http://opds-spec.org/acquisition";
    pub const IMAGE: &str = "http://opds-spec.org/image";
    pub const THUMBNAIL: &str = "http://opds-spec.org/image/thumbnail";
    pub const FACET: &str = "http://opds-spec.org/facet";
}

/// MIME types for OPDS
pub mod mime {
    pub const ATOM_XML: &str = "application/atom+xml";
    pub const OPENSEARCH: &str = "application/opensearchdescription+xml";
}

fn atom(tag: &str) -> Schema {
    Schema::tag(tag).ns(NsSpec::one("atom"))
}

fn dublin_core(tag: &str) -> Schema {
    Schema::tag(tag).ns(NsSpec::any_of(["dcterms", "dc"]))
}

fn person(tag: &str) -> Schema {
    atom(tag)
        .array()
        .field("name", atom("name"))
        .field("uri", atom("uri"))
        .field("email", atom("email"))
}

fn link() -> Schema {
    atom("link")
        .array()
        .attr("href")
        .attr("rel")
        .attr("type")
        .attr("title")
        .attr("hreflang")
        .attr_with("length", AttrSchema::plain().transform(Transform::Integer))
        .attr_with("facetGroup", AttrSchema::plain().ns(NsSpec::one("opds")))
        .attr_with(
            "activeFacet",
            AttrSchema::plain()
                .ns(NsSpec::one("opds"))
                .transform(Transform::Flag),
        )
        .attr_with(
            "count",
            AttrSchema::plain()
                .ns(NsSpec::one("thr"))
                .transform(Transform::Integer),
        )
        .attr_with(
            "pseCount",
            AttrSchema::plain()
                .ns(NsSpec::one("pse"))
                .transform(Transform::Integer),
        )
        .field(
            "prices",
            Schema::tag("price")
                .ns(NsSpec::one("opds"))
                .array()
                .attr("currencycode")
                .content(Transform::Number),
        )
        .field(
            "indirectAcquisitions",
            Schema::tag("indirectAcquisition")
                .ns(NsSpec::one("opds"))
                .array()
                .attr("type")
                .recursive(),
        )
}

fn entry() -> Schema {
    atom("entry")
        .array()
        .field("id", atom("id"))
        .field("title", atom("title"))
        .field("updated", atom("updated"))
        .field("published", atom("published"))
        .field("summary", atom("summary"))
        .field("content", atom("content").manual(map_content))
        .field("rights", atom("rights"))
        .field("authors", person("author"))
        .field("contributors", person("contributor"))
        .field(
            "categories",
            atom("category")
                .array()
                .attr("term")
                .attr("label")
                .attr("scheme"),
        )
        .field("links", link())
        .field("language", dublin_core("language"))
        .field("publisher", dublin_core("publisher"))
        .field("issued", dublin_core("issued"))
        .field("identifiers", dublin_core("identifier").array())
}

/// Schema of an Atom/OPDS feed document
pub static FEED: Lazy<Schema> = Lazy::new(|| {
    let opensearch = |tag: &str| {
        Schema::tag(tag)
            .ns(NsSpec::one("opensearch"))
            .transform(Transform::Integer)
    };

    atom("feed")
        .field("id", atom("id"))
        .field("title", atom("title"))
        .field("subtitle", atom("subtitle"))
        .field("updated", atom("updated"))
        .field("icon", atom("icon"))
        .field("authors", person("author"))
        .field("links", link())
        .field("entries", entry())
        .field("totalResults", opensearch("totalResults"))
        .field("itemsPerPage", opensearch("itemsPerPage"))
        .field("startIndex", opensearch("startIndex"))
});

/// Schema of a standalone entry document
pub static ENTRY: Lazy<Schema> = Lazy::new(|| Schema {
    array: false,
    ..entry()
});

/// Schema of an OpenSearch description document
pub static OPENSEARCH: Lazy<Schema> = Lazy::new(|| {
    let os = |tag: &str| Schema::tag(tag).ns(NsSpec::one("opensearch"));
    os("OpenSearchDescription")
        .field("shortName", os("ShortName"))
        .field("description", os("Description"))
        .field(
            "urls",
            os("Url").array().attr("template").attr("type").attr("rel"),
        )
});

/// Atom content: inner markup for `xhtml`, text otherwise
fn map_content(node: Node<'_, '_>, _: &Namespaces) -> Option<Value> {
    let kind = node.attribute("type").unwrap_or("text");
    let body = if kind == "xhtml" {
        inner_markup(node)
    } else {
        text_content(node)
    };
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    Some(json!({ "type": kind, "value": body }))
}

fn inner_markup(node: Node<'_, '_>) -> String {
    match (node.first_child(), node.last_child()) {
        (Some(first), Some(last)) => {
            node.document().input_text()[first.range().start..last.range().end].to_string()
        }
        _ => String::new(),
    }
}

fn parse_date(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok().or_else(|| {
        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
        Some(date.and_hms_opt(0, 0, 0)?.and_utc().fixed_offset())
    })
}

/// An OPDS feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Feed {
    pub id: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub updated: Option<String>,
    pub icon: Option<String>,
    pub authors: Vec<Person>,
    pub links: Vec<Link>,
    pub entries: Vec<Entry>,
    pub total_results: Option<i64>,
    pub items_per_page: Option<i64>,
    pub start_index: Option<i64>,
}

/// A catalog entry (book or navigation item)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Entry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub updated: Option<String>,
    pub published: Option<String>,
    pub summary: Option<String>,
    pub content: Option<Content>,
    pub rights: Option<String>,
    pub authors: Vec<Person>,
    pub contributors: Vec<Person>,
    pub categories: Vec<Category>,
    pub links: Vec<Link>,
    pub language: Option<String>,
    pub publisher: Option<String>,
    pub issued: Option<String>,
    pub identifiers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub name: Option<String>,
    pub uri: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub term: Option<String>,
    pub label: Option<String>,
    pub scheme: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(rename = "type")]
    pub content_type: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Link {
    pub href: Option<String>,
    pub rel: Option<String>,
    #[serde(rename = "type")]
    pub link_type: Option<String>,
    pub title: Option<String>,
    pub hreflang: Option<String>,
    pub length: Option<i64>,
    pub facet_group: Option<String>,
    pub active_facet: Option<bool>,
    pub count: Option<i64>,
    pub pse_count: Option<i64>,
    pub prices: Vec<Price>,
    pub indirect_acquisitions: Vec<IndirectAcquisition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Price {
    #[serde(rename = "currencycode")]
    pub currency_code: Option<String>,
    #[serde(rename = "content")]
    pub value: Option<f64>,
}

/// Format chain a publication goes through before the final type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndirectAcquisition {
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub indirect_acquisitions: Vec<IndirectAcquisition>,
}

/// An OpenSearch description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenSearch {
    pub short_name: Option<String>,
    pub description: Option<String>,
    pub urls: Vec<SearchUrl>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchUrl {
    pub template: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub rel: Option<String>,
}

static OPTIONAL_PARAM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\?\}").expect("valid regex"));

impl Feed {
    /// First link with the given relation
    pub fn link(&self, rel: &str) -> Option<&Link> {
        find_link(&self.links, rel)
    }

    pub fn next_page(&self) -> Option<&Link> {
        self.link(rel::NEXT)
    }

    pub fn previous_page(&self) -> Option<&Link> {
        self.link(rel::PREVIOUS)
    }

    pub fn search_link(&self) -> Option<&Link> {
        self.link(rel::SEARCH)
    }

    /// Facet links grouped by `opds:facetGroup`
    pub fn facet_groups(&self) -> BTreeMap<&str, Vec<&Link>> {
        let mut groups: BTreeMap<&str, Vec<&Link>> = BTreeMap::new();
        for link in self.links.iter().filter(|l| l.rel.as_deref() == Some(rel::FACET)) {
            let group = link.facet_group.as_deref().unwrap_or_default();
            groups.entry(group).or_default().push(link);
        }
        groups
    }

    /// True when any entry can be acquired (as opposed to a navigation feed)
    pub fn is_acquisition_feed(&self) -> bool {
        self.entries.iter().any(|e| e.acquisition_links().next().is_some())
    }

    pub fn updated_at(&self) -> Option<DateTime<FixedOffset>> {
        self.updated.as_deref().and_then(parse_date)
    }
}

impl Entry {
    pub fn link(&self, rel: &str) -> Option<&Link> {
        find_link(&self.links, rel)
    }

    pub fn acquisition_links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|l| l.is_acquisition())
    }

    /// Cover image, falling back to the thumbnail
    pub fn cover(&self) -> Option<&Link> {
        self.link(rel::IMAGE).or_else(|| self.link(rel::THUMBNAIL))
    }

    pub fn updated_at(&self) -> Option<DateTime<FixedOffset>> {
        self.updated.as_deref().and_then(parse_date)
    }

    pub fn published_at(&self) -> Option<DateTime<FixedOffset>> {
        self.published
            .as_deref()
            .or(self.issued.as_deref())
            .and_then(parse_date)
    }
}

impl Link {
    pub fn is_acquisition(&self) -> bool {
        self.rel
            .as_deref()
            .is_some_and(|rel| rel.starts_with(rel::ACQUISITION))
    }

    /// Media type after following the indirect acquisition chain
    pub fn final_type(&self) -> Option<&str> {
        let mut chain = self.indirect_acquisitions.first();
        let mut last = None;
        while let Some(step) = chain {
            last = step.media_type.as_deref();
            chain = step.indirect_acquisitions.first();
        }
        last.or(self.link_type.as_deref())
    }
}

impl OpenSearch {
    /// Fill the template of the Atom search URL with `terms`
    pub fn search_url(&self, terms: &str) -> Option<String> {
        let url = self
            .urls
            .iter()
            .find(|u| {
                u.media_type
                    .as_deref()
                    .is_some_and(|t| t.starts_with(mime::ATOM_XML))
            })
            .or_else(|| self.urls.first())?;

        let template = url.template.as_deref()?;
        let filled = template.replace("{searchTerms}", &urlencoding::encode(terms));
        Some(OPTIONAL_PARAM.replace_all(&filled, "").into_owned())
    }
}

fn find_link<'a>(links: &'a [Link], rel: &str) -> Option<&'a Link> {
    links.iter().find(|l| l.rel.as_deref() == Some(rel))
}

/// Parse an OPDS feed document
pub fn parse_feed(xml: &str, namespaces: &Namespaces) -> Result<Feed, MapError> {
    let value = Mapper::new(namespaces).map_document(xml, &FEED)?;
    let feed: Feed = serde_json::from_value(value)?;
    tracing::debug!(
        entries = feed.entries.len(),
        links = feed.links.len(),
        "Parsed OPDS feed"
    );
    Ok(feed)
}

/// Parse a standalone OPDS entry document
pub fn parse_entry(xml: &str, namespaces: &Namespaces) -> Result<Entry, MapError> {
    let value = Mapper::new(namespaces).map_document(xml, &ENTRY)?;
    Ok(serde_json::from_value(value)?)
}

/// Parse an OpenSearch description document
pub fn parse_opensearch(xml: &str, namespaces: &Namespaces) -> Result<OpenSearch, MapError> {
    let value = Mapper::new(namespaces).map_document(xml, &OPENSEARCH)?;
    Ok(serde_json::from_value(value)?)
}
