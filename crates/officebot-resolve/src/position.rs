//! Job title resolution
//!
//! A title such as `Alcalde de [[Vic]]` or `[[Senat d'Espanya|Senador]]`
//! is turned into a position-held claim. Linked titles go through an ordered
//! rule table keyed on the display text and the linked page title; titles
//! without links go through a smaller table of phrase patterns.
//!
//! # Rule order
//!
//! The first matching rule decides. A rule whose strategy fails does not
//! fall through to later rules.

use crate::collab::{Collaborators, WikiPage};
use crate::district::{DistrictRef, DistrictResolver};
use crate::error::{ResolveError, ResolveResult};
use crate::lexicon::Lexicon;
use crate::organization::{HeadOf, ListWord, OrganizationLookup};
use officebot_extract::{find_links, WikiLink};
use officebot_model::{props, Claim, EntityId};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

static ORDINAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)[rntéèa]\.? .+").expect("valid ordinal regex"));

/// Office claim plus qualifiers found inside the title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPosition {
    /// Position held (P39) claim
    pub claim: Claim,
    /// Qualifiers read from secondary links and ordinals
    pub qualifiers: Vec<Claim>,
}

impl ResolvedPosition {
    /// Office entity of the claim
    #[inline]
    #[must_use]
    pub fn office(&self) -> Option<EntityId> {
        self.claim.value.as_entity()
    }
}

/// What a link rule inspects
#[derive(Debug, Clone, Copy)]
enum Matcher {
    /// Display text starts with one of the words
    DisplayStarts(&'static [&'static str]),
    /// Display text contains the word anywhere
    DisplayMentions(&'static str),
    /// Linked page title starts with one of the words
    TitleStarts(&'static [&'static str]),
}

impl Matcher {
    fn matches(self, display: &str, title: &str) -> bool {
        match self {
            Self::DisplayStarts(words) => words.iter().any(|w| display.starts_with(w)),
            Self::DisplayMentions(word) => display.contains(word),
            Self::TitleStarts(words) => words.iter().any(|w| title.starts_with(w)),
        }
    }
}

/// Lookup used when the linked page is not the office itself
#[derive(Debug, Clone, Copy)]
enum Fallback {
    Nothing,
    HeadOf(HeadOf, ListWord),
    HasPart,
}

#[derive(Debug, Clone, Copy)]
enum Strategy {
    /// The linked page is the office
    Direct,
    /// Direct when the page title starts with `prefix` (and not `unless`)
    DirectWhenTitled {
        prefix: &'static str,
        unless: Option<&'static str>,
        otherwise: Fallback,
    },
    /// Membership office from the lexicon when the link is `chamber`
    MemberOffice {
        chamber: &'static str,
        otherwise: Fallback,
    },
    /// Single part of the linked organisation
    HasPart,
    /// Head of government of the second link (`[[Governador]] de [[X]]`)
    HeadOfSecondLink,
}

#[derive(Debug, Clone, Copy)]
struct PositionRule {
    name: &'static str,
    matcher: Matcher,
    strategy: Strategy,
}

const LINK_RULES: &[PositionRule] = &[
    PositionRule {
        name: "alcalde",
        matcher: Matcher::DisplayStarts(&["alcalde"]),
        strategy: Strategy::DirectWhenTitled {
            prefix: "alcalde",
            unless: None,
            otherwise: Fallback::HeadOf(HeadOf::Government, ListWord::new("alcalde")),
        },
    },
    PositionRule {
        name: "diputat",
        matcher: Matcher::DisplayStarts(&["diputa"]),
        strategy: Strategy::MemberOffice {
            chamber: "Parlament de Catalunya",
            otherwise: Fallback::HasPart,
        },
    },
    PositionRule {
        name: "governador",
        matcher: Matcher::TitleStarts(&["governador"]),
        strategy: Strategy::HeadOfSecondLink,
    },
    PositionRule {
        name: "khediv",
        matcher: Matcher::TitleStarts(&["khediv", "kediv"]),
        strategy: Strategy::Direct,
    },
    PositionRule {
        name: "membre",
        matcher: Matcher::DisplayStarts(&["membre"]),
        strategy: Strategy::HasPart,
    },
    PositionRule {
        name: "ministre",
        matcher: Matcher::DisplayStarts(&["ministr"]),
        strategy: Strategy::DirectWhenTitled {
            prefix: "ministr",
            unless: None,
            otherwise: Fallback::HeadOf(
                HeadOf::Government,
                ListWord::with_prefix("ministr", "Ministeri"),
            ),
        },
    },
    PositionRule {
        name: "president",
        matcher: Matcher::DisplayMentions("president"),
        strategy: Strategy::DirectWhenTitled {
            prefix: "president",
            unless: None,
            otherwise: Fallback::HeadOf(HeadOf::Government, ListWord::new("president")),
        },
    },
    PositionRule {
        name: "rei",
        matcher: Matcher::DisplayStarts(&["rei"]),
        strategy: Strategy::DirectWhenTitled {
            prefix: "rei",
            unless: Some("reis"),
            otherwise: Fallback::HeadOf(HeadOf::State, ListWord::new("rei")),
        },
    },
    PositionRule {
        name: "arquebisbe",
        matcher: Matcher::DisplayStarts(&["arquebisbe"]),
        strategy: Strategy::DirectWhenTitled {
            prefix: "arquebisbe",
            unless: None,
            otherwise: Fallback::Nothing,
        },
    },
    PositionRule {
        name: "secretari",
        matcher: Matcher::DisplayStarts(&["secretari d", "secretària d"]),
        strategy: Strategy::DirectWhenTitled {
            prefix: "secretari d",
            unless: None,
            otherwise: Fallback::Nothing,
        },
    },
    PositionRule {
        name: "senador",
        matcher: Matcher::DisplayStarts(&["senador"]),
        strategy: Strategy::MemberOffice {
            chamber: "Senat d'Espanya",
            otherwise: Fallback::Nothing,
        },
    },
];

/// Target of a phrase rule
#[derive(Debug, Clone, Copy)]
enum PhraseTarget {
    HeadOf(HeadOf),
    Ambassador,
    Sovereign,
}

struct PhraseRule {
    prefixes: &'static [&'static str],
    pattern: Option<Regex>,
    target: PhraseTarget,
}

fn phrase(prefixes: &'static [&'static str], pattern: &str, target: PhraseTarget) -> PhraseRule {
    let pattern = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("valid phrase regex");
    PhraseRule {
        prefixes,
        pattern: Some(pattern),
        target,
    }
}

static PHRASE_RULES: Lazy<Vec<PhraseRule>> = Lazy::new(|| {
    vec![
        phrase(
            &["alcalde"],
            r"^alcalde\S*\s(?:de |d')(?P<organization>.+)",
            PhraseTarget::HeadOf(HeadOf::Government),
        ),
        phrase(
            &["president"],
            r"^president\S*\s(?:de la |de |d'|del )(?P<organization>.+)",
            PhraseTarget::HeadOf(HeadOf::State),
        ),
        phrase(
            &["primer ministr", "primera ministr"],
            r"^primera? ministr\S*\s(?:de la |de |d'|del )(?P<organization>.+)",
            PhraseTarget::HeadOf(HeadOf::Government),
        ),
        phrase(
            &["rei"],
            r"^rei\S*\s(?:de |d')(?P<organization>.+)",
            PhraseTarget::HeadOf(HeadOf::State),
        ),
        PhraseRule {
            prefixes: &["ambaixador"],
            pattern: None,
            target: PhraseTarget::Ambassador,
        },
        phrase(
            &["soldà"],
            r"^soldà\S*\s(?:de la |de |d'|del )(?P<organization>.+)",
            PhraseTarget::Sovereign,
        ),
    ]
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SecondaryScan {
    AppointedBy,
    Diocese,
    ElectoralDistrict,
}

/// Job title → position-held claim
#[derive(Debug, Clone, Copy)]
pub struct PositionResolver<'a> {
    ctx: Collaborators<'a>,
    lexicon: &'a Lexicon,
}

impl<'a> PositionResolver<'a> {
    /// Create resolver
    #[must_use]
    pub fn new(ctx: Collaborators<'a>, lexicon: &'a Lexicon) -> Self {
        Self { ctx, lexicon }
    }

    fn lookup(&self) -> OrganizationLookup<'a> {
        OrganizationLookup::new(self.ctx)
    }

    /// Resolve a raw title
    ///
    /// # Errors
    /// `ResolveError` when no rule applies or the applicable rule cannot
    /// find exactly one office.
    pub fn resolve(&self, value: &str) -> ResolveResult<ResolvedPosition> {
        let value = value.trim();
        let links = find_links(value);

        let outcome = if links.is_empty() {
            self.resolve_phrase(value).map(|office| (office, Vec::new()))
        } else {
            self.resolve_linked(value, &links).map(|office| {
                let mut qualifiers = self.scan_secondary_links(value, &links, office);
                let display = links[0].text.as_deref().unwrap_or(value);
                if let Some(ordinal) = series_ordinal(value, display) {
                    qualifiers.push(Claim::string(props::SERIES_ORDINAL, ordinal));
                }
                (office, qualifiers)
            })
        };

        match outcome {
            Ok((office, qualifiers)) => {
                let office = self.lexicon.remap(office);
                tracing::info!(value, office = %office, "resolved position");
                Ok(ResolvedPosition {
                    claim: Claim::entity(props::POSITION_HELD, office),
                    qualifiers,
                })
            }
            Err(err) => {
                tracing::error!(value, error = %err, "failed resolving position");
                Err(err)
            }
        }
    }

    fn resolve_linked(&self, value: &str, links: &[WikiLink]) -> ResolveResult<EntityId> {
        let first = &links[0];
        let lookup = self.lookup();
        let page = lookup.page(&first.target)?;
        let title = page.lower_title();

        if first.text.is_none() && value.starts_with("[[") {
            return if title.starts_with("llista") {
                lookup.list_of(&page)
            } else {
                lookup.entity(&page)
            };
        }

        let display = first.text.as_deref().unwrap_or(value).to_lowercase();
        let rule = LINK_RULES
            .iter()
            .find(|rule| rule.matcher.matches(&display, &title))
            .ok_or_else(|| ResolveError::NoRule(value.to_string()))?;
        tracing::debug!(rule = rule.name, page = %page, "position rule");

        match rule.strategy {
            Strategy::Direct => lookup.entity(&page),
            Strategy::DirectWhenTitled {
                prefix,
                unless,
                otherwise,
            } => {
                let titled = title.starts_with(prefix) && !unless.is_some_and(|u| title.starts_with(u));
                if titled {
                    lookup.entity(&page)
                } else {
                    self.fallback(value, &page, first, otherwise)
                }
            }
            Strategy::MemberOffice { chamber, otherwise } => {
                if page.title == chamber {
                    self.lexicon
                        .member_offices
                        .get(chamber)
                        .copied()
                        .ok_or_else(|| ResolveError::missing_mapping("member_offices", chamber))
                } else {
                    self.fallback(value, &page, first, otherwise)
                }
            }
            Strategy::HasPart => lookup.has_part_of_link(&first.target),
            Strategy::HeadOfSecondLink => match links {
                [_, state] => lookup.head_office_of_link(&state.target, HeadOf::Government),
                _ => Err(ResolveError::NoRule(value.to_string())),
            },
        }
    }

    fn fallback(
        &self,
        value: &str,
        page: &WikiPage,
        link: &WikiLink,
        fallback: Fallback,
    ) -> ResolveResult<EntityId> {
        match fallback {
            Fallback::Nothing => Err(ResolveError::NoRule(value.to_string())),
            Fallback::HeadOf(head, list) => self.lookup().head_office_of_page(page, head, Some(list)),
            Fallback::HasPart => self.lookup().has_part_of_link(&link.target),
        }
    }

    fn resolve_phrase(&self, value: &str) -> ResolveResult<EntityId> {
        let lower = value.to_lowercase();
        let rule = PHRASE_RULES
            .iter()
            .find(|rule| rule.prefixes.iter().any(|p| lower.starts_with(p)))
            .ok_or_else(|| ResolveError::NoRule(value.to_string()))?;

        if let PhraseTarget::Ambassador = rule.target {
            return self.ambassador(value);
        }

        let organization = rule
            .pattern
            .as_ref()
            .and_then(|pattern| pattern.captures(value))
            .and_then(|caps| caps.name("organization"))
            .map(|m| m.as_str().trim())
            .ok_or_else(|| ResolveError::NoRule(value.to_string()))?;
        let organization = self.lexicon.organization_name(organization);

        match rule.target {
            PhraseTarget::HeadOf(head) => self.lookup().head_office_of_link(organization, head),
            PhraseTarget::Sovereign => self
                .lexicon
                .sovereigns
                .get(organization)
                .copied()
                .ok_or_else(|| ResolveError::missing_mapping("sovereigns", organization)),
            PhraseTarget::Ambassador => self.ambassador(value),
        }
    }

    fn ambassador(&self, value: &str) -> ResolveResult<EntityId> {
        let mut joined = value.to_string();
        for country in self.lexicon.multi_word_countries() {
            joined = joined.replace(&country.replace('_', " "), country);
        }
        let countries: Vec<String> = joined
            .split(|c: char| c.is_whitespace() || c == '\'')
            .filter(|word| self.lexicon.is_country(word))
            .map(str::to_string)
            .collect();

        match countries.as_slice() {
            [of, to] => self
                .lexicon
                .ambassador(of, to)
                .ok_or_else(|| ResolveError::missing_mapping("ambassadors", format!("{of}-{to}"))),
            _ => Err(ResolveError::NotACountryPair(countries)),
        }
    }

    fn scan_secondary_links(&self, value: &str, links: &[WikiLink], office: EntityId) -> Vec<Claim> {
        let lower = value.to_lowercase();
        let pair = links.len() == 2;
        let mut qualifiers = Vec::new();

        for link in links.iter().skip(1) {
            let mut scan = None;
            if pair && value.contains("designa") {
                scan = Some(SecondaryScan::AppointedBy);
            }
            if link.target.to_lowercase().contains("arquebisbat") {
                scan = Some(SecondaryScan::Diocese);
            }
            if pair
                && value.contains(" per ")
                && (lower.contains("diputa") || lower.contains("senador"))
            {
                scan = Some(SecondaryScan::ElectoralDistrict);
            }
            let Some(scan) = scan else { continue };

            let resolved = match scan {
                SecondaryScan::AppointedBy => self
                    .lookup()
                    .entity_for_link(&link.target)
                    .map(|e| Claim::entity(props::APPOINTED_BY, e)),
                SecondaryScan::Diocese => self
                    .lookup()
                    .entity_for_link(&link.target)
                    .map(|e| Claim::entity(props::DIOCESE, e)),
                SecondaryScan::ElectoralDistrict => DistrictResolver::new(self.ctx, self.lexicon)
                    .resolve(&DistrictRef::from_link(link), Some(office))
                    .map(|e| Claim::entity(props::ELECTORAL_DISTRICT, e)),
            };
            match resolved {
                Ok(claim) => {
                    tracing::debug!(claim = %claim, "qualifier from title");
                    qualifiers.push(claim);
                }
                Err(err) => tracing::warn!(link = %link.target, error = %err, "title qualifier unresolved"),
            }
        }
        qualifiers
    }
}

/// Ordinal prefix of a title (`12è president …` → `12`)
fn series_ordinal(value: &str, display: &str) -> Option<String> {
    let starts_with_digit = |s: &str| s.chars().next().is_some_and(|c| c.is_ascii_digit());
    let text = if starts_with_digit(value) {
        value
    } else if starts_with_digit(display) {
        display
    } else {
        return None;
    };
    ORDINAL_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
