/// A single map creation request as accepted by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRequest {
    pub user_id: String,
    pub map_id: String,
    /// Free-form place name, geocoded and printed on the map.
    pub location: String,
    /// Local wall-clock time `YYYY-MM-DD HH:MM`, printed verbatim.
    pub when: String,
}

impl MapRequest {
    pub fn new(
        user_id: impl Into<String>,
        map_id: impl Into<String>,
        location: impl Into<String>,
        when: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            map_id: map_id.into(),
            location: location.into(),
            when: when.into(),
        }
    }
}
