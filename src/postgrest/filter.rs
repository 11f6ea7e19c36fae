//! Filter and ordering parameters for table queries

/// Equality filter on one column
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    pub fn eq<T: ToString>(column: &str, value: T) -> Self {
        Self {
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    /// Query-string form, e.g. `id=eq.42`
    pub fn to_param(&self) -> (String, String) {
        (self.column.clone(), format!("eq.{}", self.value))
    }
}

/// Sort order on one column
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            ascending: true,
        }
    }

    pub fn desc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            ascending: false,
        }
    }

    /// Query-string form, e.g. `order=created_at.desc`
    pub fn to_param(&self) -> (String, String) {
        let direction = if self.ascending { "asc" } else { "desc" };
        ("order".to_string(), format!("{}.{}", self.column, direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params() {
        assert_eq!(
            Filter::eq("collaborator_id", 7).to_param(),
            ("collaborator_id".to_string(), "eq.7".to_string())
        );
        assert_eq!(
            Order::desc("created_at").to_param(),
            ("order".to_string(), "created_at.desc".to_string())
        );
        assert_eq!(Order::asc("display_order").to_param().1, "display_order.asc");
    }
}
