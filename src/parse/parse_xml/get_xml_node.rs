use std::{any::type_name, str::FromStr};

use roxmltree::Node;

use crate::{Name, Problem, ProblemAt, ProblemsMut};

pub(crate) trait GetXmlNode {
    fn find_required_child(&self, tag: &str) -> Result<Node, ProblemAt>;

    fn text_content(&self) -> String;

    fn required_text(&self) -> Result<String, ProblemAt>;

    fn parse_text<T: FromStr>(&self) -> Result<T, ProblemAt>
    where
        <T as FromStr>::Err: std::error::Error + Send + Sync + 'static;

    fn text_name(&self, problems: &mut impl ProblemsMut) -> Result<Name, ProblemAt>;
}

impl GetXmlNode for Node<'_, '_> {
    /// Find the first child node with the given tag name.
    fn find_required_child(&self, tag: &str) -> Result<Node, ProblemAt> {
        match self.children().find(|n| n.has_tag_name(tag)) {
            Some(n) => Ok(n),
            None => Err(Problem::XmlNodeMissing {
                missing: tag.to_owned(),
                parent: self.tag_name().name().to_owned(),
            }
            .at(self)),
        }
    }

    /// Text inside the node, empty if there is none.
    fn text_content(&self) -> String {
        self.text().unwrap_or_default().to_owned()
    }

    /// Text inside the node, or a problem if it is blank.
    fn required_text(&self) -> Result<String, ProblemAt> {
        match self.text() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_owned()),
            _ => Err(Problem::EmptyValue {
                field: "text".into(),
                tag: self.tag_name().name().to_owned(),
            }
            .at(self)),
        }
    }

    /// Parse the trimmed text inside the node to `T`.
    fn parse_text<T: FromStr>(&self) -> Result<T, ProblemAt>
    where
        <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
    {
        let content = self.text().unwrap_or_default().trim();
        content.parse::<T>().map_err(|err| self.invalid_text(content, err, type_name::<T>()))
    }

    /// Text inside the node as the name of a channel. Blank text is a
    /// problem, disallowed chars are replaced, pushing a problem.
    fn text_name(&self, problems: &mut impl ProblemsMut) -> Result<Name, ProblemAt> {
        let content = self.required_text()?;
        Ok(Name::try_from(content.as_str()).unwrap_or_else(|e| {
            let fixed = e.fixed.clone();
            self.invalid_text(&content, e, "Name")
                .handled_by("replacing invalid chars with '□'", problems);
            fixed
        }))
    }
}

trait InvalidText {
    fn invalid_text<E>(&self, content: &str, err: E, expected_type: &str) -> ProblemAt
    where
        E: std::error::Error + Send + Sync + 'static;
}

impl InvalidText for Node<'_, '_> {
    fn invalid_text<E>(&self, content: &str, err: E, expected_type: &str) -> ProblemAt
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Problem::InvalidText {
            tag: self.tag_name().name().to_owned(),
            content: content.to_owned(),
            source: Box::new(err),
            expected_type: expected_type.to_owned(),
        }
        .at(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::{ChannelGroup, Problems};

    use super::*;

    #[test]
    fn text() {
        let xml = "<Channel><Group Byte=\"0\">\n  Pan  </Group><Model/><Colour>Mauve</Colour></Channel>";
        let doc = roxmltree::Document::parse(xml).unwrap();
        let channel = doc.root_element();

        let group = channel.find_required_child("Group").unwrap();
        assert_eq!(group.parse_text::<ChannelGroup>().unwrap(), ChannelGroup::Pan);

        let model = channel.find_required_child("Model").unwrap();
        assert_eq!(model.text_content(), "");
        assert!(matches!(
            model.required_text().unwrap_err().problem(),
            Problem::EmptyValue { tag, .. } if tag == "Model"
        ));

        let colour = channel.find_required_child("Colour").unwrap();
        assert!(matches!(
            colour.parse_text::<crate::PrimaryColour>().unwrap_err().problem(),
            Problem::InvalidText { content, .. } if content == "Mauve"
        ));

        assert!(matches!(
            channel.find_required_child("Capability").unwrap_err().problem(),
            Problem::XmlNodeMissing { missing, parent } if missing == "Capability" && parent == "Channel"
        ));
    }

    #[test]
    fn text_names_are_fixed() {
        let doc = roxmltree::Document::parse("<Channel>a&#9;b</Channel>").unwrap();
        let mut problems: Problems = vec![];
        assert_eq!(doc.root_element().text_name(&mut problems).unwrap(), "a□b");
        assert_eq!(problems.len(), 1);
    }
}
