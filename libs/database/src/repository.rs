use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait,
};

/// Thin generic base for SeaORM-backed repositories.
///
/// Domain repositories embed this to share the connection handle and the
/// boilerplate insert/count paths; anything entity-specific stays in the
/// domain crate.
pub struct BaseRepository<E: EntityTrait> {
    db: DatabaseConnection,
    _entity: std::marker::PhantomData<E>,
}

impl<E: EntityTrait> BaseRepository<E> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: std::marker::PhantomData,
        }
    }

    /// Borrow the underlying connection for entity-specific queries
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Insert an active model and return the stored model
    pub async fn insert<A>(&self, model: A) -> Result<E::Model, DbErr>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        model.insert(&self.db).await
    }

    /// Count all rows of the entity
    pub async fn count(&self) -> Result<u64, DbErr>
    where
        E::Model: Send + Sync,
    {
        E::find().count(&self.db).await
    }
}
