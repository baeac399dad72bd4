use super::{ContentSource, ImageRequest, MathParser};
use crate::model::*;
use roxmltree::Node;

impl<S: ContentSource> MathParser<S> {
    pub(super) fn parse_image(&mut self, node: Node) -> Cell {
        let name = node.text().unwrap_or("");
        let mut image = self.load_image(name, is_deletable(node));
        image.draw_rectangle = node.attribute("rect") != Some("false");
        let mut cell = Cell::new(CellKind::Image(image));
        cell.cell_type = CellType::Image;
        cell
    }

    /// `<slide fr="2">frame1.png;frame2.png</slide>`
    pub(super) fn parse_animation(&mut self, node: Node) -> Cell {
        let deletable = is_deletable(node);
        let frame_rate = node.attribute("fr").and_then(|fr| fr.trim().parse().ok());
        let frames = node
            .text()
            .unwrap_or("")
            .split(';')
            .filter(|name| !name.is_empty())
            .map(|name| self.load_image(name, deletable))
            .collect();
        let mut cell = Cell::new(CellKind::Animation(AnimationCell { frames, frame_rate }));
        cell.cell_type = CellType::Slide;
        cell
    }

    fn load_image(&mut self, name: &str, deletable: bool) -> ImageCell {
        let source = if name.is_empty() {
            ImageSource::Missing
        } else {
            self.source.resolve_image(ImageRequest { name, deletable })
        };
        ImageCell {
            name: name.to_string(),
            deletable: deletable && matches!(source, ImageSource::Path { .. }),
            source,
            draw_rectangle: true,
        }
    }
}

/// Images written by Maxima are temporaries unless marked `del="no"`.
fn is_deletable(node: Node) -> bool {
    node.attribute("del") != Some("no")
}
