/// Filters for a dataset search.
///
/// Within one facet every listed value must match (`AND`), and an empty
/// facet imposes no constraint. Each `with_*` call consumes the query and
/// returns the updated value, so queries can be chained and shared freely.
///
/// ```
/// use ckanapi::Query;
///
/// let q = Query::new()
///     .with_text("viabilità ferroviaria")
///     .with_groups(["gestione-del-territorio"])
///     .with_tags(["strati prioritari", "cisis"])
///     .with_license("cc-zero");
/// assert_eq!(q.tags().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    text: String,
    groups: Vec<String>,
    organizations: Vec<String>,
    tags: Vec<String>,
    licenses: Vec<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Free text, i.e. `"health care London"`.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = collect(groups);
        self
    }

    pub fn with_organization(self, organization: impl Into<String>) -> Self {
        self.with_organizations([organization])
    }

    pub fn with_organizations<I, S>(mut self, organizations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.organizations = collect(organizations);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = collect(tags);
        self
    }

    /// License id, i.e. `cc-by`.
    pub fn with_license(self, license: impl Into<String>) -> Self {
        self.with_licenses([license])
    }

    pub fn with_licenses<I, S>(mut self, licenses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.licenses = collect(licenses);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn organizations(&self) -> &[String] {
        &self.organizations
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn licenses(&self) -> &[String] {
        &self.licenses
    }

    /// Renders the Solr filter query CKAN's `package_search` takes as `fq`,
    /// i.e. `groups:"a" AND tags:"b" AND tags:"c"`.
    ///
    /// Facets are always rendered in the order groups, organization, tags,
    /// license. Returns `None` when no facet is constrained.
    pub fn filter_query(&self) -> Option<String> {
        let facets: [(&str, &[String]); 4] = [
            ("groups", &self.groups),
            ("organization", &self.organizations),
            ("tags", &self.tags),
            ("license_id", &self.licenses),
        ];

        let clauses: Vec<String> = facets
            .iter()
            .flat_map(|(field, values)| {
                values
                    .iter()
                    .map(move |v| format!("{field}:\"{}\"", escape(v)))
            })
            .collect();

        if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(" AND "))
        }
    }

    /// Query parameters for `package_search`: `q` when there is text, then
    /// `fq` when any facet is constrained.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(2);
        if !self.text.is_empty() {
            params.push(("q", self.text.clone()));
        }
        if let Some(fq) = self.filter_query() {
            params.push(("fq", fq));
        }
        params
    }
}

fn collect<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_query_has_no_params() {
        assert!(Query::new().to_params().is_empty());
        assert!(Query::new().with_tags(Vec::<String>::new()).to_params().is_empty());
    }

    #[test]
    fn every_tag_is_required() {
        let q = Query::new().with_tags(["a", "b"]);
        assert_eq!(
            q.to_params(),
            vec![("fq", r#"tags:"a" AND tags:"b""#.to_string())]
        );
    }

    #[test]
    fn facets_render_in_fixed_order() {
        let q = Query::new()
            .with_license("cc-zero")
            .with_tags(["cisis"])
            .with_organization("pat")
            .with_groups(["territorio", "ambiente"])
            .with_text("laghi");

        assert_eq!(
            q.to_params(),
            vec![
                ("q", "laghi".to_string()),
                (
                    "fq",
                    r#"groups:"territorio" AND groups:"ambiente" AND organization:"pat" AND tags:"cisis" AND license_id:"cc-zero""#
                        .to_string()
                ),
            ]
        );
    }

    #[test]
    fn odd_input_is_escaped_not_rejected() {
        let q = Query::new().with_tags([r#"say "hi" \o/"#, ""]);
        assert_eq!(
            q.filter_query().unwrap(),
            r#"tags:"say \"hi\" \\o/" AND tags:"""#
        );
    }

    #[test]
    fn setters_replace_previous_values() {
        let base = Query::new().with_tags(["a"]);
        let other = base.clone().with_tags(["b"]);
        assert_eq!(base.tags().to_vec(), vec!["a".to_string()]);
        assert_eq!(other.tags().to_vec(), vec!["b".to_string()]);
    }
}
