use super::geography::DistrictEntry;

/// Handle for one in-flight district listing. A completed load is applied
/// only while its ticket still matches the catalog epoch, so a late-arriving
/// listing for a superseded region selection is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistrictLoadTicket {
    epoch: u64,
}

/// Cache of the administrative hierarchy for one wizard session. Regions are
/// populated once on open; the district payload is replaced wholesale on
/// every region change, never merged.
#[derive(Debug, Default)]
pub struct LocationCatalog {
    regions: Vec<String>,
    districts: Vec<DistrictEntry>,
    loading_districts: bool,
    epoch: u64,
}

impl LocationCatalog {
    pub fn set_regions(&mut self, regions: Vec<String>) {
        self.regions = regions;
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn districts(&self) -> &[DistrictEntry] {
        &self.districts
    }

    pub fn has_district(&self, name: &str) -> bool {
        self.districts.iter().any(|entry| entry.name == name)
    }

    /// True between `begin_district_load` and the matching completion; the
    /// district selector shows a loading affordance while set.
    pub fn is_loading_districts(&self) -> bool {
        self.loading_districts
    }

    /// Invalidates the cached district payload and starts a new load.
    pub fn begin_district_load(&mut self) -> DistrictLoadTicket {
        self.epoch += 1;
        self.districts.clear();
        self.loading_districts = true;
        DistrictLoadTicket { epoch: self.epoch }
    }

    /// Applies a finished listing. Returns false when the ticket belongs to a
    /// superseded selection; the listing is dropped in that case.
    pub fn complete_district_load(
        &mut self,
        ticket: DistrictLoadTicket,
        districts: Vec<DistrictEntry>,
    ) -> bool {
        if ticket.epoch != self.epoch {
            return false;
        }
        self.districts = districts;
        self.loading_districts = false;
        true
    }

    /// Drops the district payload without starting a load, e.g. when the
    /// region selection is cleared. Also invalidates any in-flight ticket.
    pub fn reset_districts(&mut self) {
        self.epoch += 1;
        self.districts.clear();
        self.loading_districts = false;
    }

    /// Pure lookup into the cached district payload; never issues a remote
    /// call. Unknown names yield an empty slice.
    pub fn subdistricts_for(&self, district: &str) -> &[String] {
        self.districts
            .iter()
            .find(|entry| entry.name == district)
            .map(|entry| entry.subdistricts.as_slice())
            .unwrap_or(&[])
    }

    /// Ends the catalog's session. The epoch stays monotonic so tickets from
    /// the previous session can never match a future load.
    pub fn clear(&mut self) {
        self.regions.clear();
        self.reset_districts();
    }
}
