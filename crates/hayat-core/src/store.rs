use crate::dialogues::DialogueRepository;
use crate::error::HayatError;
use crate::mothers::MotherRepository;
use crate::requests::RequestRepository;
use crate::responses::ResponseRepository;
use crate::volunteers::VolunteerRepository;

pub trait Store {
    type Mothers<'a>: MotherRepository
    where
        Self: 'a;
    type Volunteers<'a>: VolunteerRepository
    where
        Self: 'a;
    type Requests<'a>: RequestRepository
    where
        Self: 'a;
    type Dialogues<'a>: DialogueRepository
    where
        Self: 'a;
    type Responses<'a>: ResponseRepository
    where
        Self: 'a;

    fn mothers(&self) -> Self::Mothers<'_>;
    fn volunteers(&self) -> Self::Volunteers<'_>;
    fn requests(&self) -> Self::Requests<'_>;
    fn dialogues(&self) -> Self::Dialogues<'_>;
    fn responses(&self) -> Self::Responses<'_>;

    fn with_tx<F, T>(&self, f: F) -> Result<T, HayatError>
    where
        F: FnOnce(&Self) -> Result<T, HayatError>;
}
