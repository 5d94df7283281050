use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub title: String,
    pub image: Image,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    #[serde(default)]
    pub alt: String,
}

impl Place {
    pub fn new(id: impl Into<String>, title: impl Into<String>, image: Image) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image,
            description: String::new(),
            lat: None,
            lon: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Ids are assigned by the backend, so a blank one can never be associated.
    pub fn has_valid_id(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

#[test]
fn deserialize_backend_place_test() {
    let place: Place = serde_json::from_str(
        r#"{
            "id": "p1",
            "title": "Forest Waterfall",
            "image": { "src": "forest-waterfall.jpg", "alt": "A tranquil forest with a cascading waterfall" },
            "lat": 44.5588,
            "lon": -80.344
        }"#,
    )
    .unwrap();

    assert_eq!(place.id, "p1");
    assert_eq!(place.image.src, "forest-waterfall.jpg");
    assert_eq!(place.description, "");
    assert_eq!(place.lat, Some(44.5588));
}

#[test]
fn valid_id_test() {
    assert!(Place::new("p1", "Forest Waterfall", Image::default()).has_valid_id());
    assert!(!Place::new("", "Nowhere", Image::default()).has_valid_id());
    assert!(!Place::new("  ", "Nowhere", Image::default()).has_valid_id());
}
