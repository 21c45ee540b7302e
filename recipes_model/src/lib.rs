use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use time::OffsetDateTime;

pub use serde_json;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub String);

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecipeId {
    fn from(id: &str) -> Self {
        RecipeId(id.to_string())
    }
}

/// The fields the viewer reads. Everything else stays in the raw record.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipeFields {
    #[serde(default)]
    id: Option<RecipeId>,
    name: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    ingredients: Option<Vec<String>>,
    #[serde(default)]
    instructions: Option<Vec<String>>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    published_at: Option<OffsetDateTime>,
}

/// A recipe as served by `GET /recipes`.
///
/// The typed fields are a checked view over the record the service sent.
/// Serialising writes that record back out exactly as it was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    id: Option<RecipeId>,
    name: String,
    tags: Vec<String>,
    ingredients: Vec<String>,
    instructions: Vec<String>,
    published_at: Option<OffsetDateTime>,
    raw: Map<String, Value>,
}

impl Recipe {
    fn from_raw(raw: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let fields = serde_json::from_value::<RecipeFields>(Value::Object(raw.clone()))?;
        Ok(Recipe {
            id: fields.id,
            name: fields.name,
            tags: fields.tags.unwrap_or_default(),
            ingredients: fields.ingredients.unwrap_or_default(),
            instructions: fields.instructions.unwrap_or_default(),
            published_at: fields.published_at,
            raw,
        })
    }

    pub fn id(&self) -> Option<&RecipeId> {
        self.id.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    pub fn published_at(&self) -> Option<OffsetDateTime> {
        self.published_at
    }

    pub fn set_id(&mut self, id: RecipeId) {
        self.raw.insert("id".to_string(), Value::String(id.0.clone()));
        self.id = Some(id);
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

impl Serialize for Recipe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Recipe {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Map::deserialize(deserializer)?;
        Recipe::from_raw(raw).map_err(D::Error::custom)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Response body is not JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Expected a JSON array of recipes, found a JSON {found}")]
    NotAnArray { found: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("entry is a JSON {0}, not an object")]
    NotAnObject(&'static str),
    #[error("{0}")]
    Invalid(String),
    #[error("recipe name is blank")]
    BlankName,
    #[error("id {0} already used by an earlier entry")]
    DuplicateId(RecipeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecipe {
    /// Position of the entry in the response array.
    pub index: usize,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeBatch {
    pub recipes: Vec<Recipe>,
    pub rejected: Vec<RejectedRecipe>,
}

impl RecipeBatch {
    pub fn from_entries(entries: Vec<Value>) -> Self {
        let mut seen_ids = HashSet::new();
        let mut batch = RecipeBatch::default();
        for (index, entry) in entries.into_iter().enumerate() {
            match parse_entry(entry, &mut seen_ids) {
                Ok(recipe) => batch.recipes.push(recipe),
                Err(reason) => batch.rejected.push(RejectedRecipe { index, reason }),
            }
        }
        batch
    }
}

fn parse_entry(entry: Value, seen_ids: &mut HashSet<RecipeId>) -> Result<Recipe, RejectReason> {
    if !entry.is_object() {
        return Err(RejectReason::NotAnObject(json_kind(&entry)));
    }
    let recipe = serde_json::from_value::<Recipe>(entry)
        .map_err(|err| RejectReason::Invalid(err.to_string()))?;
    if recipe.name().trim().is_empty() {
        return Err(RejectReason::BlankName);
    }
    if let Some(id) = &recipe.id {
        if !seen_ids.insert(id.clone()) {
            return Err(RejectReason::DuplicateId(id.clone()));
        }
    }
    Ok(recipe)
}

/// Parses a `GET /recipes` body. The body as a whole must be a JSON array;
/// entries that don't describe a recipe are reported in
/// [`RecipeBatch::rejected`] rather than failing the whole batch.
pub fn parse_recipes(body: &str) -> Result<RecipeBatch, ParseError> {
    match serde_json::from_str::<Value>(body)? {
        Value::Array(entries) => Ok(RecipeBatch::from_entries(entries)),
        other => Err(ParseError::NotAnArray {
            found: json_kind(&other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_records_in_order() {
        let batch = parse_recipes(r#"[{"name":"Soup"},{"name":"Salad"}]"#).unwrap();
        let names = batch
            .recipes
            .iter()
            .map(Recipe::name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Soup", "Salad"]);
        assert!(batch.rejected.is_empty());
    }

    #[test]
    fn empty_array_is_an_empty_batch() {
        assert_eq!(parse_recipes("[]").unwrap(), RecipeBatch::default());
    }

    fn round_trip(raw: &Value) -> Value {
        let body = serde_json::to_string(&json!([raw])).unwrap();
        let batch = parse_recipes(&body).unwrap();
        assert_eq!(batch.recipes.len(), 1);
        serde_json::to_value(&batch.recipes[0]).unwrap()
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let raw = json!({
            "id": "600dcc85a65917cbd1f201b0",
            "name": "Homemade Pizza",
            "tags": ["italian", "pizza"],
            "ingredients": ["1 1/2 cups warm water"],
            "instructions": ["Step 1."],
            "rating": 4.5,
            "author": {"name": "Ada"}
        });
        let recipe: Recipe = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(recipe.id(), Some(&RecipeId::from("600dcc85a65917cbd1f201b0")));
        assert_eq!(recipe.tags().to_vec(), vec!["italian", "pizza"]);
        assert_eq!(serde_json::to_value(&recipe).unwrap(), raw);
    }

    #[test]
    fn empty_and_null_fields_are_kept() {
        for raw in [
            json!({"name": "Soup"}),
            json!({"name": "Soup", "tags": []}),
            json!({"id": null, "name": "Soup"}),
            json!({"name": "Soup", "publishedAt": null}),
            json!({"name": "Soup", "ingredients": null, "instructions": []}),
        ] {
            assert_eq!(round_trip(&raw), raw);
        }
    }

    #[test]
    fn published_at_keeps_its_text() {
        let raw = json!({"name": "Soup", "publishedAt": "2021-01-17T19:28:52.000Z"});
        assert_eq!(round_trip(&raw), raw);

        let recipe: Recipe = serde_json::from_value(raw).unwrap();
        let published = recipe.published_at().unwrap();
        assert_eq!(published.year(), 2021);
        assert_eq!(published.day(), 17);
    }

    #[test]
    fn null_lists_read_as_empty() {
        let recipe: Recipe =
            serde_json::from_value(json!({"id": null, "name": "Soup", "tags": null})).unwrap();
        assert_eq!(recipe.id(), None);
        assert!(recipe.tags().is_empty());
    }

    #[test]
    fn bad_timestamp_is_rejected() {
        let batch = parse_recipes(r#"[{"name":"Soup","publishedAt":"yesterday"}]"#).unwrap();
        assert!(batch.recipes.is_empty());
        assert!(matches!(batch.rejected[0].reason, RejectReason::Invalid(_)));
    }

    #[test]
    fn set_id_is_serialised() {
        let mut recipe: Recipe = serde_json::from_value(json!({"name": "Soup"})).unwrap();
        recipe.set_id(RecipeId::from("abc"));
        assert_eq!(recipe.id(), Some(&RecipeId::from("abc")));
        assert_eq!(
            serde_json::to_value(&recipe).unwrap(),
            json!({"id": "abc", "name": "Soup"})
        );
    }

    #[test]
    fn malformed_entries_are_rejected_not_fatal() {
        let body = r#"[
            {"name": "Soup"},
            "Salad",
            {"tags": ["no name"]},
            {"name": "   "},
            {"name": "Stew", "tags": "not-a-list"},
            {"name": "Bread"}
        ]"#;
        let batch = parse_recipes(body).unwrap();
        let names = batch
            .recipes
            .iter()
            .map(Recipe::name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Soup", "Bread"]);
        let indices = batch.rejected.iter().map(|r| r.index).collect::<Vec<_>>();
        assert_eq!(indices, vec![1, 2, 3, 4]);
        assert_eq!(batch.rejected[0].reason, RejectReason::NotAnObject("string"));
        assert_eq!(batch.rejected[2].reason, RejectReason::BlankName);
        assert!(matches!(batch.rejected[1].reason, RejectReason::Invalid(_)));
        assert!(matches!(batch.rejected[3].reason, RejectReason::Invalid(_)));
    }

    #[test]
    fn duplicate_ids_keep_the_first_entry() {
        let body = r#"[
            {"id": "a", "name": "Soup"},
            {"id": "a", "name": "Other soup"},
            {"id": "b", "name": "Salad"}
        ]"#;
        let batch = parse_recipes(body).unwrap();
        assert_eq!(batch.recipes.len(), 2);
        assert_eq!(batch.recipes[0].name(), "Soup");
        assert_eq!(
            batch.rejected,
            vec![RejectedRecipe {
                index: 1,
                reason: RejectReason::DuplicateId(RecipeId::from("a")),
            }]
        );
    }

    #[test]
    fn non_array_body_is_an_error() {
        match parse_recipes(r#"{"recipes": []}"#) {
            Err(ParseError::NotAnArray { found }) => assert_eq!(found, "object"),
            other => panic!("unexpected result {other:?}"),
        }
        match parse_recipes("null") {
            Err(err) => assert_eq!(
                err.to_string(),
                "Expected a JSON array of recipes, found a JSON null"
            ),
            other => panic!("unexpected result {other:?}"),
        }
        assert!(matches!(
            parse_recipes("<html>oops</html>"),
            Err(ParseError::Json(_))
        ));
    }
}
