//! Core library for the hospitality.fyi site
//!
//! This crate implements the **Functional Core** of the site, following the
//! Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`hospitality_core`** (this crate): Pure transformation functions with zero I/O
//! - **`hospitality`**: HTTP serving, content store access and the CLI (the Imperative Shell)
//!
//! All functions in this crate are pure: the same fetched record set and the
//! same request attributes always produce the same result. Nothing here
//! performs I/O, logs, or keeps state between calls, so everything is tested
//! with plain fixture data.
//!
//! # Module Organization
//!
//! - [`slug`]: Slug <-> display form conversion for subcategories and tags
//! - [`catalog`]: Filtering the ordered record set (subcategory, tag, slug, scope)
//! - [`pagination`]: Page windows with a single canonical address for page 1
//! - [`related`]: Related articles with the whole-catalog fallback
//! - [`edge`]: The ordered, short-circuiting edge request filter
//! - [`queries`]: Content store queries, as GROQ or evaluated locally
//! - [`views`], [`home`], [`routes`], [`sitemap`]: Per-route view models and addresses
//! - [`config`]: TOML site configuration
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use hospitality_core::pagination::{PageAddress, Paginator};
//! use hospitality_core::views::listing_view;
//!
//! let articles: Vec<Article> = fetch_all().await?;
//! let window = Paginator::default().window(&articles, PageAddress::Paginated(2))?;
//! let view = listing_view(&articles, &window);
//!
//! assert_eq!(view.pagination.prev_href.as_deref(), Some("/articles"));
//! ```

pub mod article;
pub mod catalog;
pub mod config;
pub mod edge;
pub mod home;
pub mod pagination;
pub mod queries;
pub mod related;
pub mod routes;
pub mod sitemap;
pub mod slug;
pub mod views;
