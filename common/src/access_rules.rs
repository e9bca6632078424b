use mongodb::bson::oid::ObjectId;

use crate::{auth::Auth, entities::letter::Letter};

pub trait AccessRules<Object, Subject> {
    fn get_access(&self, object: Object, subject: Subject) -> bool;
}

pub struct Read;

/// Owner or the user the letter replies to.
impl<'a, 'b> AccessRules<&'a ObjectId, &'b Letter> for Read {
    fn get_access(&self, user_id: &'a ObjectId, letter: &'b Letter) -> bool {
        &letter.user_id == user_id || letter.reply_to.as_ref() == Some(user_id)
    }
}

pub struct GetData;

impl<'a> AccessRules<&'a Auth, ()> for GetData {
    fn get_access(&self, auth: &'a Auth, _user: ()) -> bool {
        match auth {
            Auth::Service(_, _) | Auth::Admin(_) => true,
            Auth::User(_) => false,
            Auth::None => false,
        }
    }
}
