//! Reviewer eligibility rules shared by assignment and reassignment

use std::collections::HashSet;

use crate::model::User;

/// Active teammates of `author_id`, excluding the author, in ascending id order
pub fn eligible_pool(members: &[User], author_id: &str) -> Vec<String> {
    let mut pool: Vec<String> = members
        .iter()
        .filter(|member| member.is_active && member.user_id != author_id)
        .map(|member| member.user_id.clone())
        .collect();
    pool.sort();
    pool.dedup();
    pool
}

/// Replacement candidates for `old_reviewer` in ascending id order
///
/// Excludes inactive members, the author, the reviewer being replaced and
/// everyone already reviewing.
pub fn candidate_pool(
    members: &[User],
    author_id: &str,
    old_reviewer: &str,
    current_reviewers: &[String],
) -> Vec<String> {
    let assigned: HashSet<&str> = current_reviewers.iter().map(String::as_str).collect();
    eligible_pool(members, author_id)
        .into_iter()
        .filter(|id| id != old_reviewer && !assigned.contains(id.as_str()))
        .collect()
}

/// The deterministic replacement: lowest id in the candidate pool
pub fn first_candidate(
    members: &[User],
    author_id: &str,
    old_reviewer: &str,
    current_reviewers: &[String],
) -> Option<String> {
    candidate_pool(members, author_id, old_reviewer, current_reviewers)
        .into_iter()
        .next()
}

/// Check a drawn reviewer set against the pool it was drawn from
///
/// Returns a description of the first violated rule.
pub fn check_drawn_reviewers(
    pool: &[String],
    drawn: &[String],
    expected: usize,
) -> Result<(), String> {
    if drawn.len() != expected {
        return Err(format!(
            "picker returned {} reviewers, expected {}",
            drawn.len(),
            expected
        ));
    }
    let mut seen = HashSet::new();
    for id in drawn {
        if !pool.contains(id) {
            return Err(format!("picker returned {} outside the eligible pool", id));
        }
        if !seen.insert(id.as_str()) {
            return Err(format!("picker returned {} twice", id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, active: bool) -> User {
        User {
            user_id: id.to_string(),
            username: format!("name-{}", id),
            team_name: "backend".to_string(),
            is_active: active,
        }
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_eligible_pool_skips_author_and_inactive() {
        let members = vec![
            user("u3", true),
            user("u1", true),
            user("u4", false),
            user("u2", true),
        ];
        assert_eq!(eligible_pool(&members, "u1"), ids(&["u2", "u3"]));
    }

    #[test]
    fn test_eligible_pool_empty_team() {
        assert!(eligible_pool(&[user("u1", true)], "u1").is_empty());
    }

    #[test]
    fn test_candidate_pool_excludes_current_reviewers() {
        let members = vec![
            user("u1", true),
            user("u2", true),
            user("u3", true),
            user("u4", true),
            user("u5", true),
        ];
        let current = ids(&["u2", "u3"]);
        assert_eq!(
            candidate_pool(&members, "u1", "u2", &current),
            ids(&["u4", "u5"])
        );
        assert_eq!(
            first_candidate(&members, "u1", "u2", &current),
            Some("u4".to_string())
        );
    }

    #[test]
    fn test_first_candidate_none_when_only_reviewers_active() {
        let members = vec![
            user("u1", true),
            user("u2", true),
            user("u3", true),
            user("u4", false),
        ];
        assert_eq!(
            first_candidate(&members, "u1", "u2", &ids(&["u2", "u3"])),
            None
        );
    }

    #[test]
    fn test_first_candidate_uses_byte_order() {
        let members = vec![user("bob", true), user("Zed", true), user("alice", true)];
        assert_eq!(
            first_candidate(&members, "author", "carol", &ids(&["carol"])),
            Some("Zed".to_string())
        );
    }

    #[test]
    fn test_check_drawn_reviewers() {
        let pool = ids(&["u2", "u3", "u4"]);
        assert!(check_drawn_reviewers(&pool, &ids(&["u4", "u2"]), 2).is_ok());
        assert!(check_drawn_reviewers(&pool, &ids(&["u2", "u2"]), 2).is_err());
        assert!(check_drawn_reviewers(&pool, &ids(&["u1", "u2"]), 2).is_err());
        assert!(check_drawn_reviewers(&pool, &ids(&["u2"]), 2).is_err());
    }
}
