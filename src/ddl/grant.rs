use compact_str::CompactString;
use indexmap::IndexSet;

use crate::{
    case_sensitivity::CaseSensitivitySetup,
    error::{ProvisionError, ProvisionResult},
    token::TokenCategory
};

/// Set of normalized role or privilege tokens, in insertion order.
pub type TokenSet = IndexSet<CompactString>;

/// Grant and revoke statements computed by
/// [`GrantStatementBuilder::reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub to_grant:  Vec<String>,
    pub to_revoke: Vec<String>
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.to_grant.is_empty() && self.to_revoke.is_empty()
    }
}

/// Normalize raw tokens into a [`TokenSet`] for one category.
pub fn normalized_set<I, S>(setup: &CaseSensitivitySetup, category: TokenCategory, tokens: I) -> TokenSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>
{
    tokens
        .into_iter()
        .map(|t| CompactString::from(setup.normalize(category, t.as_ref())))
        .collect()
}

/// Set differences `(desired - current, current - desired)`.
pub fn diff(current: &TokenSet, desired: &TokenSet) -> (TokenSet, TokenSet) {
    let to_grant = desired.difference(current).cloned().collect();
    let to_revoke = current.difference(desired).cloned().collect();
    (to_grant, to_revoke)
}

/// Synthesizes one `grant`/`revoke` statement per role or privilege token.
///
/// Statements are never batched, so executing a list stops at a well-defined
/// prefix when one statement fails. No ordering between the grant and the
/// revoke list is implied.
#[derive(Debug, Clone, Copy)]
pub struct GrantStatementBuilder<'a> {
    setup: &'a CaseSensitivitySetup
}

impl<'a> GrantStatementBuilder<'a> {
    pub fn new(setup: &'a CaseSensitivitySetup) -> Self {
        Self {
            setup
        }
    }

    /// `grant <token> to <user>` for every token.
    ///
    /// # Errors
    ///
    /// [`ProvisionError::UnsupportedCategory`] unless `category` is
    /// [`TokenCategory::Role`] or [`TokenCategory::Privilege`].
    pub fn grant<I, S>(
        &self,
        user_name: &str,
        tokens: I,
        category: TokenCategory
    ) -> ProvisionResult<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>
    {
        check_category(category)?;
        let user = self.setup.format(TokenCategory::UserName, user_name);
        Ok(tokens
            .into_iter()
            .map(|t| format!("grant {} to {}", self.setup.format(category, t.as_ref()), user))
            .collect())
    }

    /// `revoke <token> from <user>` for every token.
    ///
    /// # Errors
    ///
    /// Same as [`grant`](Self::grant).
    pub fn revoke<I, S>(
        &self,
        user_name: &str,
        tokens: I,
        category: TokenCategory
    ) -> ProvisionResult<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>
    {
        check_category(category)?;
        let user = self.setup.format(TokenCategory::UserName, user_name);
        Ok(tokens
            .into_iter()
            .map(|t| format!("revoke {} from {}", self.setup.format(category, t.as_ref()), user))
            .collect())
    }

    /// Statements moving `current` to `desired`.
    ///
    /// Omitted vs. explicitly empty desired sets are the caller's concern;
    /// this only diffs the two sets it is given.
    pub fn reconcile(
        &self,
        user_name: &str,
        current: &TokenSet,
        desired: &TokenSet,
        category: TokenCategory
    ) -> ProvisionResult<Reconciliation> {
        check_category(category)?;
        let (to_grant, to_revoke) = diff(current, desired);
        Ok(Reconciliation {
            to_grant:  self.grant(user_name, &to_grant, category)?,
            to_revoke: self.revoke(user_name, &to_revoke, category)?
        })
    }
}

fn check_category(category: TokenCategory) -> ProvisionResult<()> {
    match category {
        TokenCategory::Role | TokenCategory::Privilege => Ok(()),
        other => Err(ProvisionError::UnsupportedCategory(other.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tokens: &[&str]) -> TokenSet {
        tokens.iter().map(|t| CompactString::from(*t)).collect()
    }

    #[test]
    fn test_diff_keeps_input_order() {
        let (grant, revoke) = diff(&set(&["A", "B", "C"]), &set(&["D", "B", "E"]));
        assert_eq!(grant, set(&["D", "E"]));
        assert_eq!(revoke, set(&["A", "C"]));
    }

    #[test]
    fn test_check_category() {
        assert!(check_category(TokenCategory::Role).is_ok());
        assert!(check_category(TokenCategory::Privilege).is_ok());
        assert_eq!(
            check_category(TokenCategory::Profile),
            Err(ProvisionError::UnsupportedCategory("PROFILE"))
        );
    }
}
