use std::collections::{BTreeMap, HashMap};

pub type LabelName = String;

pub type LabelValue = String;

pub type Labels = HashMap<LabelName, LabelValue>;

pub trait LabelsTrait {
    /// Label pairs ordered by label name.
    fn sorted(&self) -> BTreeMap<&LabelName, &LabelValue>;
}

impl LabelsTrait for Labels {
    fn sorted(&self) -> BTreeMap<&LabelName, &LabelValue> {
        self.iter().collect()
    }
}
