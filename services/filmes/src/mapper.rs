//! Conversions between the movie entity and its DTOs

use crate::models::{CreateFilmeDto, Filme, NewFilme, ReadFilmeDto, UpdateFilmeDto};

impl From<CreateFilmeDto> for NewFilme {
    fn from(dto: CreateFilmeDto) -> Self {
        Self {
            title: dto.title,
            genre: dto.genre,
            duration: dto.duration,
            release_date: dto.release_date,
        }
    }
}

impl From<Filme> for ReadFilmeDto {
    fn from(filme: Filme) -> Self {
        Self {
            id: filme.id,
            title: filme.title,
            genre: filme.genre,
            duration: filme.duration,
            release_date: filme.release_date,
        }
    }
}

impl From<&Filme> for UpdateFilmeDto {
    fn from(filme: &Filme) -> Self {
        Self {
            title: filme.title.clone(),
            genre: filme.genre.clone(),
            duration: filme.duration,
            release_date: filme.release_date,
        }
    }
}

impl UpdateFilmeDto {
    /// Overwrite every updatable field of `filme`, leaving its id untouched
    pub fn apply_to(self, filme: &mut Filme) {
        filme.title = self.title;
        filme.genre = self.genre;
        filme.duration = self.duration;
        filme.release_date = self.release_date;
    }
}
