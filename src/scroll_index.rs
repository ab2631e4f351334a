use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::io::Read;

use anyhow::{Context, Result};

use crate::content::ScrollPost;
use crate::error::{IngestionError, QueryError};
use crate::paginator::Paginator;

pub const DEFAULT_SIMILAR_LIMIT: usize = 3;

/// Immutable, query-ready collection of scroll posts.
///
/// Posts are kept most recent first (ties by descending slug). Every query
/// except [`ScrollIndex::all`] only sees published posts.
#[derive(Debug, Default)]
pub struct ScrollIndex {
    posts: Vec<ScrollPost>,
    // Indexes into `posts`, same order
    published: Vec<usize>,
    // slug -> position in `published`
    published_pos: HashMap<String, usize>,
}

#[derive(Debug, Default, PartialEq)]
pub struct Neighbors<'a> {
    pub newer: Option<&'a ScrollPost>,
    pub older: Option<&'a ScrollPost>,
}

#[derive(Debug, PartialEq)]
pub struct Page<'a> {
    pub number: u32,
    pub page_count: u32,
    pub items: Vec<&'a ScrollPost>,
}

pub fn listing_order(a: &ScrollPost, b: &ScrollPost) -> Ordering {
    b.date.cmp(&a.date).then_with(|| b.slug.cmp(&a.slug))
}

/// `2 × shared tags + 1 when both posts have the same type`.
pub fn similarity_score(target: &ScrollPost, target_tags: &HashSet<&str>, other: &ScrollPost) -> u32 {
    let shared = other.tag_set().intersection(target_tags).count() as u32;
    let same_type = if target.scroll_type == other.scroll_type { 1 } else { 0 };
    2 * shared + same_type
}

impl ScrollIndex {
    /// Builds the index from already ingested posts, e.g. a generated
    /// artifact. Slugs must be unique.
    pub fn from_posts(mut posts: Vec<ScrollPost>) -> Result<ScrollIndex, IngestionError> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (i, post) in posts.iter().enumerate() {
            if let Some(first) = seen.insert(post.slug.as_str(), i) {
                return Err(IngestionError::DuplicateSlug {
                    slug: post.slug.clone(),
                    first: format!("entry #{}", first),
                    second: format!("entry #{}", i),
                });
            }
        }

        posts.sort_by(listing_order);

        let published: Vec<usize> = posts.iter()
            .enumerate()
            .filter(|(_, p)| p.published)
            .map(|(i, _)| i)
            .collect();

        let published_pos = published.iter()
            .enumerate()
            .map(|(pos, &i)| (posts[i].slug.clone(), pos))
            .collect();

        Ok(ScrollIndex {
            posts,
            published,
            published_pos,
        })
    }

    pub fn load_json<R: Read>(reader: R) -> Result<ScrollIndex> {
        let posts: Vec<ScrollPost> = serde_json::from_reader(reader)
            .context("Error parsing scroll artifact")?;
        Ok(Self::from_posts(posts)?)
    }

    /// Every ingested post, unpublished ones included.
    pub fn all(&self) -> &[ScrollPost] {
        &self.posts
    }

    pub fn published_count(&self) -> usize {
        self.published.len()
    }

    pub fn list_published(&self) -> Vec<&ScrollPost> {
        self.published.iter().map(|&i| &self.posts[i]).collect()
    }

    pub fn find_by_slug(&self, slug: &str) -> Result<&ScrollPost, QueryError> {
        match self.published_pos.get(slug) {
            Some(&pos) => Ok(self.published_at(pos)),
            None => Err(QueryError::NotFound(slug.to_string())),
        }
    }

    /// `newer` is the post listed right before `slug`, `older` the one right
    /// after. Both are absent when the slug is unknown.
    pub fn neighbors(&self, slug: &str) -> Neighbors<'_> {
        let Some(&pos) = self.published_pos.get(slug) else {
            return Neighbors::default();
        };

        let newer = pos.checked_sub(1).map(|p| self.published_at(p));
        let older = if pos + 1 < self.published.len() {
            Some(self.published_at(pos + 1))
        } else {
            None
        };

        Neighbors { newer, older }
    }

    /// Published posts ranked by [`similarity_score`] against `slug`, then by
    /// descending date and ascending slug. Unknown slugs give an empty list.
    pub fn similar_to(&self, slug: &str, limit: usize) -> Vec<&ScrollPost> {
        let Ok(target) = self.find_by_slug(slug) else {
            return vec![];
        };
        let target_tags = target.tag_set();

        let mut scored: Vec<(u32, &ScrollPost)> = self.published.iter()
            .map(|&i| &self.posts[i])
            .filter(|p| p.slug != target.slug)
            .map(|p| (similarity_score(target, &target_tags, p), p))
            .collect();

        scored.sort_by(|(score_a, a), (score_b, b)| {
            score_b.cmp(score_a)
                .then_with(|| b.date.cmp(&a.date))
                .then_with(|| a.slug.cmp(&b.slug))
        });

        scored.into_iter().take(limit).map(|(_, p)| p).collect()
    }

    /// Tag frequencies over published posts, most used first.
    pub fn tags(&self) -> Vec<(String, usize)> {
        let mut tag_map: HashMap<&str, usize> = HashMap::new();
        for &i in self.published.iter() {
            for tag in self.posts[i].tag_set() {
                *tag_map.entry(tag).or_insert(0) += 1;
            }
        }

        let mut tag_list: Vec<(String, usize)> = tag_map.into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        tag_list.sort_by(|(ta, ca), (tb, cb)| cb.cmp(ca).then_with(|| ta.cmp(tb)));
        tag_list
    }

    pub fn with_tag(&self, tag: &str) -> Vec<&ScrollPost> {
        self.published.iter()
            .map(|&i| &self.posts[i])
            .filter(|p| p.tags.iter().any(|t| t == tag))
            .collect()
    }

    pub fn page(&self, page: u32, page_size: u32) -> Result<Page<'_>, QueryError> {
        let list = self.list_published();
        let paginator = Paginator::from(&list, page_size);
        let items = paginator.get_page(page)?.to_vec();

        Ok(Page {
            number: page,
            page_count: paginator.page_count(),
            items,
        })
    }

    fn published_at(&self, pos: usize) -> &ScrollPost {
        &self.posts[self.published[pos]]
    }
}
